use super::node::NodeId;

slotmap::new_key_type! {
    /// Unique identifier for a half-edge in the half-edge graph.
    pub struct HalfEdgeId;
}

/// A directed edge of the arrangement.
///
/// Half-edges come in twin pairs that occupy the same geometric segment in
/// opposite directions.
#[derive(Debug, Clone)]
pub struct HalfEdgeData {
    /// Origin node.
    pub from: NodeId,
    /// Destination node.
    pub to: NodeId,
    /// The opposite-direction half-edge of the same segment.
    pub twin: HalfEdgeId,
    /// Polar angle `atan2(dy, dx)` at the origin.
    pub angle: f64,
    /// Position of this half-edge in its origin's angle-sorted ring.
    pub ring_index: usize,
}
