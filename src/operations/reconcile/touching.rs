use std::collections::BTreeSet;

use crate::geometry::Segment;
use crate::math::abs_cos;
use crate::math::distance_2d::segment_to_segment_dist;

/// Distances closer than this are treated as equal.
const DIST_TIE: f64 = 1e-9;

/// Glazing groups with at least one segment lying next to, and nearly
/// parallel with, its nearest room-boundary segment.
///
/// Ungrouped glazing (group `0`) never forms a group of its own and is
/// skipped. Returned in ascending group order.
pub fn touching_groups(
    boundary: &[Segment],
    glazing: &[Segment],
    gap_tolerance: f64,
    parallel_threshold: f64,
) -> BTreeSet<u32> {
    let mut groups = BTreeSet::new();
    for g in glazing {
        if g.group() == 0 || groups.contains(&g.group()) {
            continue;
        }
        // Nearest boundary segment; equidistant candidates prefer the one
        // more parallel to the glazing.
        let mut nearest: Option<(f64, f64)> = None;
        for b in boundary {
            let dist = segment_to_segment_dist(&g.start(), &g.end(), &b.start(), &b.end());
            let cos = abs_cos(&g.direction(), &b.direction());
            let keep = nearest.is_some_and(|(d, c)| {
                d + DIST_TIE < dist || ((d - dist).abs() <= DIST_TIE && c >= cos)
            });
            if !keep {
                nearest = Some((dist, cos));
            }
        }
        let Some((dist, cos)) = nearest else {
            break;
        };
        if dist <= gap_tolerance && cos >= parallel_threshold {
            groups.insert(g.group());
        }
    }
    groups
}
