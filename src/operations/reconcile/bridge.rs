use std::collections::BTreeMap;

use crate::geometry::{PointKey, Segment, Snap};
use crate::math::distance_2d::closest_point_on_segment;
use crate::math::Point2;

/// Boundary vertices with exactly one incident segment, in key order.
pub fn dangling_ends(boundary: &[Segment], snap: Snap) -> Vec<Point2> {
    let mut degree: BTreeMap<PointKey, (usize, Point2)> = BTreeMap::new();
    for s in boundary {
        for p in [s.start(), s.end()] {
            degree.entry(snap.key(&p)).or_insert((0, p)).0 += 1;
        }
    }
    degree
        .into_values()
        .filter(|&(count, _)| count == 1)
        .map(|(_, p)| p)
        .collect()
}

/// Synthesizes one bridge per dangling end to the closest point on the
/// glazing, when that gap is longer than `bridge_eps` and no longer than
/// `max_length`.
pub fn bridges_to_glazing(
    ends: &[Point2],
    glazing: &[Segment],
    max_length: f64,
    bridge_eps: f64,
) -> Vec<Segment> {
    let mut bridges = Vec::new();
    for end in ends {
        let closest = glazing
            .iter()
            .map(|g| closest_point_on_segment(end, &g.start(), &g.end()).0)
            .map(|c| ((c - end).norm(), c))
            .min_by(|a, b| a.0.total_cmp(&b.0));
        let Some((dist, target)) = closest else {
            continue;
        };
        if dist <= max_length && dist > bridge_eps {
            bridges.push(Segment::new(*end, target));
        }
    }
    bridges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn open_u() -> Vec<Segment> {
        vec![
            Segment::new(p(10.0, 0.0), p(0.0, 0.0)),
            Segment::new(p(0.0, 0.0), p(0.0, 10.0)),
            Segment::new(p(0.0, 10.0), p(10.0, 10.0)),
        ]
    }

    #[test]
    fn open_u_has_two_dangling_ends() {
        let ends = dangling_ends(&open_u(), Snap::new(1e-4));
        assert_eq!(ends.len(), 2);
        assert!(ends.iter().all(|e| (e.x - 10.0).abs() < 1e-12));
    }

    #[test]
    fn bridges_reach_the_glazing() {
        let ends = vec![p(10.0, 0.0), p(10.0, 10.0)];
        let glazing = vec![Segment::glazing(p(10.3, -2.0), p(10.3, 12.0), 1)];
        let bridges = bridges_to_glazing(&ends, &glazing, 0.6, 1e-4);
        assert_eq!(bridges.len(), 2);
        for b in &bridges {
            assert!((b.length() - 0.3).abs() < 1e-9);
            assert!((b.end().x - 10.3).abs() < 1e-12);
        }
    }

    #[test]
    fn gaps_beyond_max_length_are_left_open() {
        let ends = vec![p(10.0, 0.0)];
        let glazing = vec![Segment::glazing(p(11.0, -2.0), p(11.0, 12.0), 1)];
        assert!(bridges_to_glazing(&ends, &glazing, 0.6, 1e-4).is_empty());
    }

    #[test]
    fn touching_ends_need_no_bridge() {
        let ends = vec![p(10.0, 0.0)];
        let glazing = vec![Segment::glazing(p(10.0, -2.0), p(10.0, 12.0), 1)];
        assert!(bridges_to_glazing(&ends, &glazing, 0.6, 1e-4).is_empty());
    }
}
