use super::distance_2d::point_to_segment_dist;
use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. The loop must not
/// repeat its first point at the end.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Perimeter of a closed polygon.
#[must_use]
pub fn perimeter_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| (points[(i + 1) % n] - points[i]).norm()).sum()
}

/// Boundary-inclusive point-in-polygon test.
///
/// A point within `eps` of any edge counts as inside; otherwise the
/// even-odd ray parity decides.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &[Point2], eps: f64) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[(i + 1) % n];
        if point_to_segment_dist(point, a, b) <= eps {
            return true;
        }
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &polygon[i];
        let pj = &polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pj.x + (point.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Drops a trailing point that repeats the first one.
#[must_use]
pub fn strip_closing_duplicate(mut points: Vec<Point2>, eps: f64) -> Vec<Point2> {
    if points.len() > 1 {
        let first = points[0];
        if points.last().is_some_and(|last| (last - first).norm() <= eps) {
            points.pop();
        }
    }
    points
}

/// Rotates a closed polygon so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Rounds a coordinate to `decimals` decimal places.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX).min(15));
    let rounded = (value * scale).round() / scale;
    // Avoid emitting "-0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Rounds both coordinates of a point to `decimals` decimal places.
#[must_use]
pub fn round_point(p: &Point2, decimals: u32) -> Point2 {
    Point2::new(round_to(p.x, decimals), round_to(p.y, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area_2d(&square()) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square();
        pts.reverse();
        assert!((signed_area_2d(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn perimeter_of_unit_square() {
        assert!((perimeter_2d(&square()) - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn point_inside_and_outside() {
        let sq = square();
        assert!(point_in_polygon(&Point2::new(0.5, 0.5), &sq, 1e-9));
        assert!(!point_in_polygon(&Point2::new(1.5, 0.5), &sq, 1e-9));
    }

    #[test]
    fn point_on_boundary_counts_as_inside() {
        let sq = square();
        assert!(point_in_polygon(&Point2::new(1.0, 0.5), &sq, 1e-9));
        assert!(point_in_polygon(&Point2::new(0.0, 0.0), &sq, 1e-9));
        assert!(point_in_polygon(&Point2::new(1.0 + 1e-7, 0.5), &sq, 1e-6));
    }

    #[test]
    fn closing_duplicate_is_removed() {
        let mut pts = square();
        pts.push(Point2::new(0.0, 0.0));
        assert_eq!(strip_closing_duplicate(pts, 1e-9).len(), 4);
    }

    #[test]
    fn canonical_start_rotation() {
        let pts = vec![
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let rotated = rotate_to_canonical_start(&pts);
        assert!(rotated[0].x.abs() < TOLERANCE);
        assert!(rotated[0].y.abs() < TOLERANCE);
        assert_eq!(rotated.len(), 4);
    }

    #[test]
    fn rounding_to_precision() {
        assert!((round_to(1.234_56, 2) - 1.23).abs() < TOLERANCE);
        assert!((round_to(-0.000_01, 3)).abs() < TOLERANCE);
        let r = round_point(&Point2::new(0.125_04, 9.999_96), 4);
        assert!((r.x - 0.125).abs() < TOLERANCE);
        assert!((r.y - 10.0).abs() < TOLERANCE);
    }
}
