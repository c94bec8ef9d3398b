use std::cmp::Ordering;

use crate::geometry::Face;
use crate::math::polygon_2d::point_in_polygon;
use crate::math::Point2;

/// Relative tolerance under which two face areas count as equal.
const AREA_TIE: f64 = 1e-9;

/// Boundary-inclusive containment: points within `eps` of an edge count as
/// inside, otherwise even-odd ray parity decides.
#[must_use]
pub fn contains(point: &Point2, polygon: &[Point2], eps: f64) -> bool {
    point_in_polygon(point, polygon, eps)
}

/// Picks the smallest face containing `point`, or `None` if no face does.
///
/// Faces are ranked by `|signed area|`. Areas within a relative `1e-9` are
/// ties, which prefer counter-clockwise faces, then the shorter perimeter,
/// then the face found first.
#[must_use]
pub fn pick_minimal_face<'a>(faces: &'a [Face], point: &Point2, eps: f64) -> Option<&'a Face> {
    let mut best: Option<&Face> = None;
    for face in faces.iter().filter(|f| f.contains(point, eps)) {
        best = match best {
            Some(current) if compare_faces(face, current) != Ordering::Less => Some(current),
            _ => Some(face),
        };
    }
    best
}

fn compare_faces(a: &Face, b: &Face) -> Ordering {
    let scale = a.area().max(b.area()).max(1.0);
    if (a.area() - b.area()).abs() > AREA_TIE * scale {
        return a.area().total_cmp(&b.area());
    }
    match (a.is_ccw(), b.is_ccw()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => {
            let (pa, pb) = (a.perimeter(), b.perimeter());
            if (pa - pb).abs() > AREA_TIE * pa.max(pb).max(1.0) {
                pa.total_cmp(&pb)
            } else {
                Ordering::Equal
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Segment, Snap};
    use crate::operations::planar::{ExtractFaces, Planarize};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Segment {
        Segment::new(p(ax, ay), p(bx, by))
    }

    fn rectangle_faces() -> Vec<Face> {
        let input = vec![
            seg(0.0, 0.0, 10.0, 0.0),
            seg(10.0, 0.0, 10.0, 10.0),
            seg(10.0, 10.0, 0.0, 10.0),
            seg(0.0, 10.0, 0.0, 0.0),
        ];
        let arr = Planarize::new(&input).execute();
        ExtractFaces::new(&arr).execute()
    }

    #[test]
    fn rectangle_minimal_face_has_area_100() {
        let faces = rectangle_faces();
        let face = pick_minimal_face(&faces, &p(5.0, 5.0), 1e-6).unwrap();
        assert_eq!(face.points().len(), 4);
        assert!((face.area() - 100.0).abs() < 1e-9);
        assert!(face.is_ccw());
    }

    #[test]
    fn point_outside_every_face_returns_none() {
        let faces = rectangle_faces();
        assert!(pick_minimal_face(&faces, &p(50.0, 5.0), 1e-6).is_none());
    }

    #[test]
    fn inner_cell_beats_enclosing_cell() {
        let faces: Vec<Face> = [
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            vec![p(2.0, 2.0), p(4.0, 2.0), p(4.0, 4.0), p(2.0, 4.0)],
        ]
        .into_iter()
        .filter_map(|pts| Face::from_loop(pts, Snap::new(1e-4)))
        .collect();
        let face = pick_minimal_face(&faces, &p(3.0, 3.0), 1e-6).unwrap();
        assert!((face.area() - 4.0).abs() < 1e-9);
        let face = pick_minimal_face(&faces, &p(8.0, 8.0), 1e-6).unwrap();
        assert!((face.area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn equal_area_tie_prefers_shorter_perimeter() {
        let faces: Vec<Face> = [
            vec![p(0.0, 0.0), p(16.0, 0.0), p(16.0, 1.0), p(0.0, 1.0)],
            vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)],
        ]
        .into_iter()
        .filter_map(|pts| Face::from_loop(pts, Snap::new(1e-4)))
        .collect();
        let face = pick_minimal_face(&faces, &p(0.5, 0.5), 1e-6).unwrap();
        assert!((face.perimeter() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn contains_is_boundary_inclusive() {
        let sq = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert!(contains(&p(1.0, 0.3), &sq, 1e-9));
        assert!(!contains(&p(1.1, 0.3), &sq, 1e-9));
    }
}
