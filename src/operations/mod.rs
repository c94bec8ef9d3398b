pub mod opening;
pub mod planar;
pub mod reconcile;
pub mod section;
