pub mod half_edge;
pub mod node;

pub use half_edge::{HalfEdgeData, HalfEdgeId};
pub use node::{NodeData, NodeId};

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use crate::error::TopologyError;
use crate::geometry::{PointKey, Segment, SegmentKey, Snap};
use crate::math::Point2;

/// Arena-backed half-edge (DCEL) view of an arrangement.
///
/// Nodes and half-edges reference each other through typed IDs. A hash map
/// from quantized coordinates to node IDs replaces point lookup by string.
/// The graph is immutable once [`HalfEdgeGraph::build`] returns.
#[derive(Debug, Default)]
pub struct HalfEdgeGraph {
    nodes: SlotMap<NodeId, NodeData>,
    half_edges: SlotMap<HalfEdgeId, HalfEdgeData>,
    node_index: FxHashMap<PointKey, NodeId>,
}

impl HalfEdgeGraph {
    /// Builds the half-edge graph of an arrangement.
    ///
    /// Each segment becomes one twin pair. Segments whose endpoints share a
    /// grid node, and repeated segments, are skipped.
    #[must_use]
    pub fn build(segments: &[Segment], snap: Snap) -> Self {
        let mut graph = Self::default();
        let mut seen: FxHashSet<SegmentKey> = FxHashSet::default();

        for seg in segments {
            let a = graph.ensure_node(seg.start(), snap);
            let b = graph.ensure_node(seg.end(), snap);
            if a == b {
                continue;
            }
            let key = SegmentKey::new(graph.nodes[a].key, graph.nodes[b].key);
            if !seen.insert(key) {
                continue;
            }
            graph.add_twin_pair(a, b);
        }

        graph.sort_rings();
        graph
    }

    fn ensure_node(&mut self, point: Point2, snap: Snap) -> NodeId {
        let key = snap.key(&point);
        if let Some(&id) = self.node_index.get(&key) {
            return id;
        }
        let id = self.nodes.insert(NodeData::new(point, key));
        self.node_index.insert(key, id);
        id
    }

    fn add_twin_pair(&mut self, a: NodeId, b: NodeId) {
        let pa = self.nodes[a].point;
        let pb = self.nodes[b].point;
        let forward = self.half_edges.insert(HalfEdgeData {
            from: a,
            to: b,
            twin: HalfEdgeId::default(),
            angle: (pb.y - pa.y).atan2(pb.x - pa.x),
            ring_index: 0,
        });
        let backward = self.half_edges.insert(HalfEdgeData {
            from: b,
            to: a,
            twin: forward,
            angle: (pa.y - pb.y).atan2(pa.x - pb.x),
            ring_index: 0,
        });
        self.half_edges[forward].twin = backward;
        self.nodes[a].ring.push(forward);
        self.nodes[b].ring.push(backward);
    }

    /// Sorts every ring by angle and caches each half-edge's ring position.
    fn sort_rings(&mut self) {
        let half_edges = &mut self.half_edges;
        for node in self.nodes.values_mut() {
            node.ring
                .sort_by(|&x, &y| half_edges[x].angle.total_cmp(&half_edges[y].angle));
            for (i, &he) in node.ring.iter().enumerate() {
                half_edges[he].ring_index = i;
            }
        }
    }

    /// Returns a reference to the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn node(&self, id: NodeId) -> Result<&NodeData, TopologyError> {
        self.nodes
            .get(id)
            .ok_or(TopologyError::EntityNotFound("node"))
    }

    /// Returns a reference to the half-edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn half_edge(&self, id: HalfEdgeId) -> Result<&HalfEdgeData, TopologyError> {
        self.half_edges
            .get(id)
            .ok_or(TopologyError::EntityNotFound("half-edge"))
    }

    /// Looks up the node sitting at `point`'s grid cell.
    #[must_use]
    pub fn node_at(&self, point: &Point2, snap: Snap) -> Option<NodeId> {
        self.node_index.get(&snap.key(point)).copied()
    }

    /// Next half-edge along the face to the left of `id`.
    ///
    /// At the destination node the twin's cached ring position is looked up
    /// and the entry immediately before it (cyclically) is chosen.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dangling ID and
    /// `TopologyError::BrokenRing` if the cached ring position does not
    /// point back at the twin.
    pub fn next_on_face(&self, id: HalfEdgeId) -> Result<HalfEdgeId, TopologyError> {
        let he = self.half_edge(id)?;
        let twin = self.half_edge(he.twin)?;
        let node = self.node(he.to)?;
        let ring = node.ring();
        if ring.get(twin.ring_index) != Some(&he.twin) {
            return Err(TopologyError::BrokenRing {
                x: node.point.x,
                y: node.point.y,
            });
        }
        let prev = (twin.ring_index + ring.len() - 1) % ring.len();
        Ok(ring[prev])
    }

    /// Iterates half-edge IDs in creation order.
    pub fn half_edge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.half_edges.keys()
    }

    /// Iterates nodes.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> + '_ {
        self.nodes.iter()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }
}
