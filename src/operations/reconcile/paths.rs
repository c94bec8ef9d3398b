use crate::geometry::Segment;
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::Point2;

/// The stretch of a room polygon running along one glazing group.
#[derive(Debug, Clone, PartialEq)]
pub struct GlazingRun {
    pub group: u32,
    pub points: Vec<Point2>,
}

/// For each group, the longest run of consecutive polygon vertices lying
/// within `tolerance` of that group's segments, in polygon order.
///
/// Groups whose best run has fewer than two points are omitted.
pub fn glazing_runs(
    polygon: &[Point2],
    glazing: &[Segment],
    groups: &[u32],
    tolerance: f64,
) -> Vec<GlazingRun> {
    groups
        .iter()
        .filter_map(|&group| {
            let members: Vec<&Segment> = glazing.iter().filter(|s| s.group() == group).collect();
            let near: Vec<bool> = polygon
                .iter()
                .map(|p| {
                    members
                        .iter()
                        .any(|s| point_to_segment_dist(p, &s.start(), &s.end()) <= tolerance)
                })
                .collect();
            let points = longest_cyclic_run(polygon, &near);
            (points.len() >= 2).then_some(GlazingRun { group, points })
        })
        .collect()
}

fn longest_cyclic_run(polygon: &[Point2], near: &[bool]) -> Vec<Point2> {
    let n = polygon.len();
    if near.iter().all(|&b| b) {
        return polygon.to_vec();
    }
    // Start scanning just after a vertex that is off the glazing so runs
    // crossing the loop seam stay whole.
    let Some(off) = near.iter().position(|&b| !b) else {
        return Vec::new();
    };

    let mut best: Vec<Point2> = Vec::new();
    let mut current: Vec<Point2> = Vec::new();
    for step in 1..=n {
        let i = (off + step) % n;
        if near[i] {
            current.push(polygon[i]);
        } else {
            if current.len() > best.len() {
                best = std::mem::take(&mut current);
            }
            current.clear();
        }
    }
    if current.len() > best.len() {
        best = current;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn run_follows_the_glazing_side() {
        let polygon = vec![
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.2, 0.0),
            p(10.2, 10.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
        ];
        let glazing = vec![Segment::glazing(p(10.2, -1.0), p(10.2, 11.0), 5)];
        let runs = glazing_runs(&polygon, &glazing, &[5], 0.05);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].group, 5);
        assert_eq!(runs[0].points, vec![p(10.2, 0.0), p(10.2, 10.0)]);
    }

    #[test]
    fn run_across_the_seam_stays_whole() {
        let polygon = vec![p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)];
        let glazing = vec![Segment::glazing(p(-1.0, 0.0), p(2.0, 0.0), 2)];
        let runs = glazing_runs(&polygon, &glazing, &[2], 1e-6);
        assert_eq!(runs[0].points, vec![p(0.0, 0.0), p(1.0, 0.0)]);
    }

    #[test]
    fn single_vertex_contact_is_omitted() {
        let polygon = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)];
        let glazing = vec![Segment::glazing(p(5.0, 5.0), p(1.0, 1.0), 2)];
        assert!(glazing_runs(&polygon, &glazing, &[2], 1e-6).is_empty());
    }
}
