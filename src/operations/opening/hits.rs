use crate::geometry::Segment;
use crate::math::intersect_2d::line_segment_hits;
use crate::math::{Point2, Vector2};

/// Nearest segment hits on either side of a point along a line.
///
/// Parameters are distances along the unit direction: `negative` is the
/// closest hit behind the origin, `positive` the closest one ahead.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineHits {
    pub negative: Option<f64>,
    pub positive: Option<f64>,
}

impl LineHits {
    /// Both sides hit.
    #[must_use]
    pub fn both(&self) -> Option<(f64, f64)> {
        self.negative.zip(self.positive)
    }
}

/// Casts the line `origin + t * dir` against `segments` and keeps the
/// nearest hit on each side. Hits within `eps` of the origin are ignored.
pub fn nearest_hits_along_line<'s>(
    origin: &Point2,
    dir: &Vector2,
    segments: impl IntoIterator<Item = &'s Segment>,
    eps: f64,
) -> LineHits {
    let mut hits = LineHits::default();
    for seg in segments {
        for t in line_segment_hits(origin, dir, &seg.start(), &seg.end(), eps) {
            if t > eps {
                hits.positive = Some(hits.positive.map_or(t, |p| p.min(t)));
            } else if t < -eps {
                hits.negative = Some(hits.negative.map_or(t, |n| n.max(t)));
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Segment {
        Segment::new(Point2::new(ax, ay), Point2::new(bx, by))
    }

    #[test]
    fn nearest_on_each_side() {
        let segs = vec![
            seg(2.0, -1.0, 2.0, 1.0),
            seg(5.0, -1.0, 5.0, 1.0),
            seg(-3.0, -1.0, -3.0, 1.0),
            seg(-1.5, -1.0, -1.5, 1.0),
        ];
        let hits = nearest_hits_along_line(&Point2::origin(), &Vector2::new(1.0, 0.0), &segs, 1e-6);
        let (neg, pos) = hits.both().unwrap_or_default();
        assert!((neg + 1.5).abs() < 1e-9);
        assert!((pos - 2.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_wall_lines_stop_at_their_ends() {
        let segs = vec![seg(-5.0, 0.1, -0.45, 0.1), seg(0.45, 0.1, 5.0, 0.1)];
        let origin = Point2::new(0.0, 0.1);
        let hits = nearest_hits_along_line(&origin, &Vector2::new(1.0, 0.0), &segs, 1e-6);
        assert_eq!(hits.negative.map(|t| (t * 100.0).round()), Some(-45.0));
        assert_eq!(hits.positive.map(|t| (t * 100.0).round()), Some(45.0));
    }

    #[test]
    fn one_sided_hit() {
        let segs = vec![seg(2.0, -1.0, 2.0, 1.0)];
        let hits = nearest_hits_along_line(&Point2::origin(), &Vector2::new(1.0, 0.0), &segs, 1e-6);
        assert!(hits.negative.is_none());
        assert!(hits.positive.is_some());
        assert!(hits.both().is_none());
    }
}
