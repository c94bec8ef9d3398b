pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Absolute cosine of the angle between two directions.
///
/// Returns `0.0` when either vector is degenerate, so degenerate input never
/// counts as parallel.
#[must_use]
pub fn abs_cos(a: &Vector2, b: &Vector2) -> f64 {
    let la = a.norm();
    let lb = b.norm();
    if la < TOLERANCE || lb < TOLERANCE {
        return 0.0;
    }
    (a.dot(b) / (la * lb)).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abs_cos_parallel_and_perpendicular() {
        let x = Vector2::new(2.0, 0.0);
        assert!((abs_cos(&x, &Vector2::new(-5.0, 0.0)) - 1.0).abs() < TOLERANCE);
        assert!(abs_cos(&x, &Vector2::new(0.0, 3.0)).abs() < TOLERANCE);
        assert!(abs_cos(&x, &Vector2::zeros()).abs() < TOLERANCE);
    }

    #[test]
    fn cross_sign_follows_orientation() {
        let x = Vector2::new(1.0, 0.0);
        let y = Vector2::new(0.0, 1.0);
        assert!(cross_2d(&x, &y) > 0.0);
        assert!(cross_2d(&y, &x) < 0.0);
    }
}
