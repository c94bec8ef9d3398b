pub mod face;
pub mod segment;
pub mod segment_set;

pub use face::{Face, MIN_FACE_AREA};
pub use segment::{PointKey, Segment, SegmentKey, Snap};
pub use segment_set::SegmentSet;
