use super::distance_2d::point_to_line_dist;
use super::{cross_2d, Point2, Vector2, TOLERANCE};

/// Unbounded 2D segment-segment parameter solve.
///
/// For segments `a0 + t * (a1 - a0)` and `b0 + u * (b1 - b0)`, returns
/// `(t, u)` of the supporting-line intersection, or `None` if the segments
/// are parallel (including degenerate zero-length input).
#[must_use]
pub fn segment_segment_params(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = cross_2d(&da, &db);
    if cross.abs() <= TOLERANCE * da.norm() * db.norm() || cross.abs() < 1e-20 {
        return None;
    }

    let d = b0 - a0;
    let t = cross_2d(&d, &db) / cross;
    let u = cross_2d(&d, &da) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are clamped into
/// `[0, 1]`. `param_eps` widens the accepted range to include endpoints.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    param_eps: f64,
) -> Option<(Point2, f64, f64)> {
    let (t, u) = segment_segment_params(a0, a1, b0, b1)?;
    let lo = -param_eps;
    let hi = 1.0 + param_eps;
    if t >= lo && t <= hi && u >= lo && u <= hi {
        let t = t.clamp(0.0, 1.0);
        Some((a0 + (a1 - a0) * t, t, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Parameters along the infinite line `origin + t * dir` at which the
/// segment `a`→`b` is met.
///
/// A transversal crossing yields one parameter. A segment lying on the line
/// (both endpoints within `eps` of it) yields the parameters of both of its
/// endpoints, so wall lines collinear with the ray stop it at their ends.
/// `dir` is expected to be a unit vector.
#[must_use]
pub fn line_segment_hits(
    origin: &Point2,
    dir: &Vector2,
    a: &Point2,
    b: &Point2,
    eps: f64,
) -> Vec<f64> {
    let seg = b - a;
    let seg_len = seg.norm();
    if seg_len < TOLERANCE {
        return Vec::new();
    }

    let far = origin + dir;
    let da = point_to_line_dist(a, origin, &far);
    let db = point_to_line_dist(b, origin, &far);
    if da <= eps && db <= eps {
        return vec![(a - origin).dot(dir), (b - origin).dot(dir)];
    }

    let cross = cross_2d(dir, &seg);
    if cross.abs() <= TOLERANCE * seg_len {
        return Vec::new();
    }
    let d = a - origin;
    let t = cross_2d(&d, &seg) / cross;
    let u = cross_2d(&d, dir) / cross;
    let u_eps = eps / seg_len;
    if u >= -u_eps && u <= 1.0 + u_eps {
        vec![t]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn segment_segment_crossing() {
        let (a0, a1) = (p(0.0, 0.0), p(2.0, 2.0));
        let (b0, b1) = (p(0.0, 2.0), p(2.0, 0.0));
        let (pt, t, u) = segment_segment_intersect_2d(&a0, &a1, &b0, &b1, 0.0).unwrap();
        assert!((pt.x - 1.0).abs() < TOLERANCE);
        assert!((pt.y - 1.0).abs() < TOLERANCE);
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn segment_segment_no_crossing() {
        let (a0, a1) = (p(0.0, 0.0), p(1.0, 0.0));
        let (b0, b1) = (p(0.0, 1.0), p(1.0, 1.0));
        let hit = segment_segment_intersect_2d(&a0, &a1, &b0, &b1, 1e-9);
        assert!(hit.is_none());
    }

    #[test]
    fn segment_segment_endpoint_touch_within_eps() {
        // T-junction: b0 lies on segment a.
        let (a0, a1) = (p(0.0, 0.0), p(4.0, 0.0));
        let (b0, b1) = (p(1.0, 0.0), p(1.0, 3.0));
        let (pt, t, u) = segment_segment_intersect_2d(&a0, &a1, &b0, &b1, 1e-9).unwrap();
        assert!((pt.x - 1.0).abs() < TOLERANCE);
        assert!((t - 0.25).abs() < TOLERANCE);
        assert!(u.abs() < TOLERANCE);
    }

    #[test]
    fn params_parallel_returns_none() {
        let (a0, a1) = (p(0.0, 0.0), p(1.0, 0.0));
        let (b0, b1) = (p(0.0, 1.0), p(1.0, 1.0));
        assert!(segment_segment_params(&a0, &a1, &b0, &b1).is_none());
    }

    #[test]
    fn line_hits_transversal() {
        let hits = line_segment_hits(
            &p(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &p(3.0, -1.0),
            &p(3.0, 1.0),
            1e-6,
        );
        assert_eq!(hits.len(), 1);
        assert!((hits[0] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn line_hits_behind_origin_are_negative() {
        let hits = line_segment_hits(
            &p(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &p(-2.0, -1.0),
            &p(-2.0, 1.0),
            1e-6,
        );
        assert_eq!(hits.len(), 1);
        assert!((hits[0] + 2.0).abs() < 1e-9);
    }

    #[test]
    fn line_hits_collinear_reports_both_ends() {
        let hits = line_segment_hits(
            &p(0.0, 0.5),
            &Vector2::new(1.0, 0.0),
            &p(1.0, 0.5),
            &p(6.0, 0.5),
            1e-6,
        );
        assert_eq!(hits.len(), 2);
        assert!((hits[0] - 1.0).abs() < 1e-9);
        assert!((hits[1] - 6.0).abs() < 1e-9);
    }

    #[test]
    fn line_hits_miss_parallel_offset() {
        let hits = line_segment_hits(
            &p(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &p(1.0, 0.5),
            &p(6.0, 0.5),
            1e-6,
        );
        assert!(hits.is_empty());
    }
}
