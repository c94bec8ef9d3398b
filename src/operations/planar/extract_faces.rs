use slotmap::SecondaryMap;
use tracing::trace;

use crate::geometry::Face;
use crate::math::Point2;
use crate::topology::{HalfEdgeGraph, HalfEdgeId};

use super::planarize::Arrangement;

/// Extracts every closed face loop of an arrangement.
///
/// Walks the half-edge graph keeping the face on the left. Bounded cells come
/// out counter-clockwise; each connected component also yields its clockwise
/// outer loop. Selecting the relevant face is left to the caller.
#[derive(Debug)]
pub struct ExtractFaces<'a> {
    arrangement: &'a Arrangement,
}

impl<'a> ExtractFaces<'a> {
    #[must_use]
    pub fn new(arrangement: &'a Arrangement) -> Self {
        Self { arrangement }
    }

    /// Runs the traversal.
    ///
    /// Loops that cannot be closed (dangling input, inconsistent rings or an
    /// exhausted iteration bound) are discarded and extraction carries on
    /// with the remaining unused half-edges.
    #[must_use]
    pub fn execute(&self) -> Vec<Face> {
        let snap = self.arrangement.snap();
        let graph = HalfEdgeGraph::build(self.arrangement.segments(), snap);
        let limit = 4 * graph.half_edge_count();

        let mut used: SecondaryMap<HalfEdgeId, ()> = SecondaryMap::new();
        let mut faces = Vec::new();
        let mut discarded = 0_usize;

        let starts: Vec<HalfEdgeId> = graph.half_edge_ids().collect();
        for start in starts {
            if used.contains_key(start) {
                continue;
            }
            match trace_loop(&graph, start, limit, &mut used) {
                Some(points) => {
                    if let Some(face) = Face::from_loop(points, snap) {
                        faces.push(face);
                    }
                }
                None => discarded += 1,
            }
        }

        trace!(
            faces = faces.len(),
            discarded,
            half_edges = graph.half_edge_count(),
            "extracted faces"
        );
        faces
    }
}

/// Follows `next_on_face` from `start` until it returns to `start`.
///
/// Returns the destination points of the walked half-edges, or `None` when
/// the walk breaks off.
fn trace_loop(
    graph: &HalfEdgeGraph,
    start: HalfEdgeId,
    limit: usize,
    used: &mut SecondaryMap<HalfEdgeId, ()>,
) -> Option<Vec<Point2>> {
    let mut points = Vec::new();
    let mut current = start;

    for _ in 0..limit {
        used.insert(current, ());
        let he = graph.half_edge(current).ok()?;
        points.push(graph.node(he.to).ok()?.point);

        let next = graph.next_on_face(current).ok()?;
        if next == start {
            return Some(points);
        }
        if used.contains_key(next) {
            return None;
        }
        current = next;
    }
    None
}
