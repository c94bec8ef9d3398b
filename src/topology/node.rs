use crate::geometry::PointKey;
use crate::math::Point2;

use super::half_edge::HalfEdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a node in the half-edge graph.
    pub struct NodeId;
}

/// A unique snapped point of the arrangement.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// The 2D position of the node.
    pub point: Point2,
    /// Grid key the node is indexed under.
    pub key: PointKey,
    /// Outgoing half-edges sorted by polar angle, ascending.
    pub(super) ring: Vec<HalfEdgeId>,
}

impl NodeData {
    /// Creates a node with no outgoing half-edges yet.
    #[must_use]
    pub fn new(point: Point2, key: PointKey) -> Self {
        Self {
            point,
            key,
            ring: Vec::new(),
        }
    }

    /// Outgoing half-edges in counter-clockwise angular order.
    #[must_use]
    pub fn ring(&self) -> &[HalfEdgeId] {
        &self.ring
    }

    /// Number of arrangement edges incident to this node.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.ring.len()
    }
}
