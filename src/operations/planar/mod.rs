mod extract_faces;
mod locate;
mod planarize;

pub use extract_faces::ExtractFaces;
pub use locate::{contains, pick_minimal_face};
pub use planarize::{Arrangement, Planarize};
