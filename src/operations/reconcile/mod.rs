mod bridge;
mod paths;
mod prune;
mod touching;

pub use bridge::{bridges_to_glazing, dangling_ends};
pub use paths::{glazing_runs, GlazingRun};
pub use touching::touching_groups;

use tracing::debug;

use crate::config::ExportConfig;
use crate::error::OperationError;
use crate::geometry::{Face, Segment, Snap};
use crate::math::Point2;

use super::planar::{pick_minimal_face, ExtractFaces, Planarize};

/// A room polygon closed against its adjacent glazing.
#[derive(Debug, Clone)]
pub struct ReconciledRoom {
    /// The minimal face containing the room's test point.
    pub face: Face,
    /// Glazing groups found touching the room, ascending.
    pub groups: Vec<u32>,
    /// Number of bridge segments synthesized.
    pub bridges: usize,
}

/// Closes a room's boundary against the glazing walls next to it.
///
/// The room boundary handed in excludes its glazing-tagged portion, so it is
/// usually open where a curtain wall runs. The glazing segments are merged
/// in, redrawn or stepped boundary pieces are pruned, dangling ends are
/// bridged onto the glazing, and the smallest face of the resulting
/// arrangement that contains the test point becomes the room polygon.
#[derive(Debug)]
pub struct RoomReconciler<'a> {
    boundary: &'a [Segment],
    glazing: &'a [Segment],
    test_point: Point2,
    config: ExportConfig,
}

impl<'a> RoomReconciler<'a> {
    /// Creates a reconciler with default tolerances.
    #[must_use]
    pub fn new(boundary: &'a [Segment], glazing: &'a [Segment], test_point: Point2) -> Self {
        Self {
            boundary,
            glazing,
            test_point,
            config: ExportConfig::default(),
        }
    }

    /// Uses the tolerances of `config`.
    #[must_use]
    pub fn with_config(mut self, config: &ExportConfig) -> Self {
        self.config = *config;
        self
    }

    /// Executes the reconciliation.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::NoTouchingGlazing` if no glazing group runs
    /// along the boundary, and `OperationError::NoEnclosingFace` if no face
    /// of the merged arrangement contains the test point. Both are expected
    /// outcomes that callers answer with their fallback chain.
    pub fn execute(&self) -> Result<ReconciledRoom, OperationError> {
        let cfg = &self.config;

        // Step 1: Find glazing groups running along the boundary.
        let groups = touching_groups(
            self.boundary,
            self.glazing,
            cfg.boundary_glazing_tolerance,
            cfg.parallel_threshold,
        );
        if groups.is_empty() {
            return Err(OperationError::NoTouchingGlazing);
        }
        let touching: Vec<Segment> = self
            .glazing
            .iter()
            .filter(|g| groups.contains(&g.group()))
            .copied()
            .collect();

        // Step 2: Prune boundary pieces drawn over the glazing, then steps.
        let reduced = prune::remove_redrawn(
            self.boundary.to_vec(),
            &touching,
            cfg.redraw_tolerance,
            cfg.parallel_threshold,
        );
        let reduced = prune::remove_steps(reduced, &touching, cfg.step_tolerance);

        // Step 3: Bridge dangling ends onto the glazing.
        let ends = dangling_ends(&reduced, Snap::new(cfg.snap_pitch));
        let bridges = bridges_to_glazing(&ends, &touching, cfg.max_bridge_length, cfg.bridge_eps);

        // Step 4: Planarize everything and pick the room cell.
        let mut assembled = reduced;
        assembled.extend_from_slice(&touching);
        assembled.extend_from_slice(&bridges);

        let arrangement = Planarize::new(&assembled).with_config(cfg).execute();
        let faces = ExtractFaces::new(&arrangement).execute();
        let face = pick_minimal_face(&faces, &self.test_point, cfg.planarize_eps)
            .cloned()
            .ok_or(OperationError::NoEnclosingFace {
                x: self.test_point.x,
                y: self.test_point.y,
            })?;

        debug!(
            groups = groups.len(),
            dangling = ends.len(),
            bridges = bridges.len(),
            area = face.area(),
            "room reconciled against glazing"
        );

        Ok(ReconciledRoom {
            face,
            groups: groups.into_iter().collect(),
            bridges: bridges.len(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Segment {
        Segment::new(p(ax, ay), p(bx, by))
    }

    /// A 10×10 room whose east side is glazing-tagged (and so excluded) except
    /// for two short opaque stubs at its corners.
    fn room_with_open_east_side() -> Vec<Segment> {
        vec![
            seg(0.0, 0.0, 10.0, 0.0),
            seg(10.0, 0.0, 10.0, 1.0),
            seg(10.0, 9.0, 10.0, 10.0),
            seg(10.0, 10.0, 0.0, 10.0),
            seg(0.0, 10.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn gap_to_offset_glazing_is_bridged() {
        let g = 0.3;
        let boundary = room_with_open_east_side();
        let glazing = vec![Segment::glazing(p(10.0 + g, 0.0), p(10.0 + g, 10.0), 4)];
        let room = RoomReconciler::new(&boundary, &glazing, p(5.0, 5.0))
            .execute()
            .unwrap();
        assert_eq!(room.groups, vec![4]);
        assert_eq!(room.bridges, 2);
        approx::assert_abs_diff_eq!(room.face.area(), 10.0 * (10.0 + g), epsilon = 1e-6);
    }

    #[test]
    fn longer_glazing_run_is_cut_at_the_bridges() {
        let g = 0.25;
        let boundary = room_with_open_east_side();
        let glazing = vec![
            Segment::glazing(p(10.0 + g, -6.0), p(10.0 + g, 4.0), 4),
            Segment::glazing(p(10.0 + g, 4.0), p(10.0 + g, 16.0), 4),
        ];
        let room = RoomReconciler::new(&boundary, &glazing, p(5.0, 5.0))
            .execute()
            .unwrap();
        approx::assert_abs_diff_eq!(room.face.area(), 10.0 * (10.0 + g), epsilon = 1e-6);
    }

    #[test]
    fn no_glazing_nearby_fails() {
        let boundary = room_with_open_east_side();
        let glazing = vec![Segment::glazing(p(30.0, 0.0), p(30.0, 10.0), 1)];
        let err = RoomReconciler::new(&boundary, &glazing, p(5.0, 5.0))
            .execute()
            .unwrap_err();
        assert!(matches!(err, OperationError::NoTouchingGlazing));
    }

    #[test]
    fn test_point_outside_fails() {
        let boundary = room_with_open_east_side();
        let glazing = vec![Segment::glazing(p(10.3, 0.0), p(10.3, 10.0), 4)];
        let err = RoomReconciler::new(&boundary, &glazing, p(50.0, 5.0))
            .execute()
            .unwrap_err();
        assert!(matches!(err, OperationError::NoEnclosingFace { .. }));
    }

    #[test]
    fn glazing_flush_with_boundary_needs_no_bridges() {
        let boundary = vec![
            seg(0.0, 0.0, 10.0, 0.0),
            seg(10.0, 10.0, 0.0, 10.0),
            seg(0.0, 10.0, 0.0, 0.0),
        ];
        let glazing = vec![Segment::glazing(p(10.0, -1.0), p(10.0, 11.0), 2)];
        // The nearest boundary piece is perpendicular, so nothing touches.
        assert!(RoomReconciler::new(&boundary, &glazing, p(5.0, 5.0))
            .execute()
            .is_err());
    }
}
