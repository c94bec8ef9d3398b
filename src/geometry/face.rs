use crate::math::polygon_2d::{perimeter_2d, point_in_polygon, signed_area_2d};
use crate::math::Point2;

use super::segment::{PointKey, Snap};

/// Smallest `|signed area|` a loop must enclose to count as a face.
pub const MIN_FACE_AREA: f64 = 1e-9;

/// A closed polygon loop extracted from an arrangement.
///
/// Points are ordered, distinct, and do not repeat the first point at the
/// end. Counter-clockwise loops (positive area) are bounded cells; the
/// clockwise loop of a component is its unbounded complement.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    points: Vec<Point2>,
    signed_area: f64,
}

impl Face {
    /// Builds a face from a traversed loop.
    ///
    /// Drops an accidental closing duplicate, collapses there-and-back spikes
    /// left by dangling edges, and rejects loops with fewer than three
    /// distinct points or `|signed area| <= MIN_FACE_AREA`.
    #[must_use]
    pub fn from_loop(points: Vec<Point2>, snap: Snap) -> Option<Self> {
        let keyed: Vec<(PointKey, Point2)> =
            points.into_iter().map(|p| (snap.key(&p), p)).collect();
        let mut keyed = collapse_spikes(keyed);

        while keyed.len() > 1 && keyed.first().map(|f| f.0) == keyed.last().map(|l| l.0) {
            keyed.pop();
        }
        if keyed.len() < 3 {
            return None;
        }

        let points: Vec<Point2> = keyed.into_iter().map(|(_, p)| p).collect();
        let signed_area = signed_area_2d(&points);
        if signed_area.abs() <= MIN_FACE_AREA {
            return None;
        }
        Some(Self {
            points,
            signed_area,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn into_points(self) -> Vec<Point2> {
        self.points
    }

    #[must_use]
    pub fn signed_area(&self) -> f64 {
        self.signed_area
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area.abs()
    }

    /// Whether the loop runs counter-clockwise (a bounded cell).
    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area > 0.0
    }

    #[must_use]
    pub fn perimeter(&self) -> f64 {
        perimeter_2d(&self.points)
    }

    /// Boundary-inclusive containment test.
    #[must_use]
    pub fn contains(&self, point: &Point2, eps: f64) -> bool {
        point_in_polygon(point, &self.points, eps)
    }
}

/// Removes `A B A` back-tracks, including ones that wrap around the loop end.
fn collapse_spikes(points: Vec<(PointKey, Point2)>) -> Vec<(PointKey, Point2)> {
    let mut stack: Vec<(PointKey, Point2)> = Vec::with_capacity(points.len());
    for p in points {
        if stack.last().is_some_and(|l| l.0 == p.0) {
            continue;
        }
        stack.push(p);
        while stack.len() >= 3 && stack[stack.len() - 3].0 == stack[stack.len() - 1].0 {
            stack.pop();
            stack.pop();
        }
    }

    loop {
        let n = stack.len();
        if n < 3 {
            break;
        }
        if stack[n - 1].0 == stack[0].0 {
            stack.pop();
        } else if stack[n - 2].0 == stack[0].0 {
            stack.truncate(n - 2);
        } else if stack[n - 1].0 == stack[1].0 {
            stack.drain(0..2);
        } else {
            break;
        }
    }
    stack
}
