use crate::geometry::Segment;
use crate::math::abs_cos;
use crate::math::distance_2d::point_to_segment_dist;

/// Drops boundary segments drawn over a touching glazing line: nearly
/// parallel to it, with both endpoints within `redraw_tolerance` of it.
pub fn remove_redrawn(
    boundary: Vec<Segment>,
    glazing: &[Segment],
    redraw_tolerance: f64,
    parallel_threshold: f64,
) -> Vec<Segment> {
    boundary
        .into_iter()
        .filter(|b| {
            !glazing.iter().any(|g| {
                abs_cos(&b.direction(), &g.direction()) >= parallel_threshold
                    && endpoint_reach(b, g) <= redraw_tolerance
            })
        })
        .collect()
}

/// Drops short step artifacts: boundary segments with both endpoints within
/// `step_tolerance` of the same touching glazing segment.
pub fn remove_steps(
    boundary: Vec<Segment>,
    glazing: &[Segment],
    step_tolerance: f64,
) -> Vec<Segment> {
    boundary
        .into_iter()
        .filter(|b| !glazing.iter().any(|g| endpoint_reach(b, g) <= step_tolerance))
        .collect()
}

/// Larger of the two endpoint distances from `b` to the segment `g`.
fn endpoint_reach(b: &Segment, g: &Segment) -> f64 {
    point_to_segment_dist(&b.start(), &g.start(), &g.end())
        .max(point_to_segment_dist(&b.end(), &g.start(), &g.end()))
}
