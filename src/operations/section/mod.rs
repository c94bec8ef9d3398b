use rustc_hash::FxHashMap;
use tracing::trace;

use crate::config::ExportConfig;
use crate::geometry::{Face, PointKey, SegmentKey, Snap};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};

/// Endpoint keys and snapped endpoints of one outline edge.
type OutlineEdge = (PointKey, PointKey, Point2, Point2);

/// A planar polygon face of a room's solid.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidFace {
    pub vertices: Vec<Point3>,
}

impl SolidFace {
    #[must_use]
    pub fn new(vertices: Vec<Point3>) -> Self {
        Self { vertices }
    }

    /// Unit normal by Newell's method, or `None` for a degenerate polygon.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3> {
        let n = self.vertices.len();
        if n < 3 {
            return None;
        }
        let mut sum = Vector3::zeros();
        for i in 0..n {
            let a = &self.vertices[i];
            let b = &self.vertices[(i + 1) % n];
            sum.x += (a.y - b.y) * (a.z + b.z);
            sum.y += (a.z - b.z) * (a.x + b.x);
            sum.z += (a.x - b.x) * (a.y + b.y);
        }
        sum.try_normalize(TOLERANCE)
    }

    /// Mean elevation of the vertices.
    #[must_use]
    pub fn elevation(&self) -> f64 {
        if self.vertices.is_empty() {
            return 0.0;
        }
        self.vertices.iter().map(|v| v.z).sum::<f64>() / self.vertices.len() as f64
    }
}

/// Derives room loops from the lowest near-horizontal faces of a solid.
///
/// Edges shared by two of those faces are interior and dropped; the rest are
/// chained into closed loops by walking from node to node. Loops come back
/// largest first.
#[derive(Debug)]
pub struct SolidSection<'a> {
    faces: &'a [SolidFace],
    horizontal_threshold: f64,
    snap: Snap,
}

impl<'a> SolidSection<'a> {
    #[must_use]
    pub fn new(faces: &'a [SolidFace]) -> Self {
        Self::with_parts(faces, &ExportConfig::default())
    }

    #[must_use]
    pub fn with_config(self, config: &ExportConfig) -> Self {
        Self::with_parts(self.faces, config)
    }

    fn with_parts(faces: &'a [SolidFace], config: &ExportConfig) -> Self {
        Self {
            faces,
            horizontal_threshold: config.horizontal_normal_threshold,
            snap: Snap::new(config.snap_pitch),
        }
    }

    #[must_use]
    pub fn execute(&self) -> Vec<Face> {
        let floor = self.lowest_horizontal_faces();
        if floor.is_empty() {
            return Vec::new();
        }

        let edges = self.outline_edges(&floor);
        let mut loops = self.chain_loops(&edges);
        loops.sort_by(|a, b| b.area().total_cmp(&a.area()));
        trace!(faces = floor.len(), edges = edges.len(), loops = loops.len(), "solid section");
        loops
    }

    fn lowest_horizontal_faces(&self) -> Vec<&'a SolidFace> {
        let horizontal: Vec<&SolidFace> = self
            .faces
            .iter()
            .filter(|f| f.normal().is_some_and(|n| n.z.abs() >= self.horizontal_threshold))
            .collect();
        let Some(lowest) = horizontal.iter().map(|f| f.elevation()).min_by(f64::total_cmp) else {
            return Vec::new();
        };
        let plane_tol = self.snap.pitch() * 10.0;
        horizontal
            .into_iter()
            .filter(|f| f.elevation() - lowest <= plane_tol)
            .collect()
    }

    /// Edges of the given faces that belong to exactly one of them.
    fn outline_edges(&self, faces: &[&SolidFace]) -> Vec<OutlineEdge> {
        let mut seen: FxHashMap<SegmentKey, (usize, OutlineEdge)> = FxHashMap::default();
        let mut order: Vec<SegmentKey> = Vec::new();

        for face in faces {
            let n = face.vertices.len();
            for i in 0..n {
                let a = self.snap.snap(&Point2::new(face.vertices[i].x, face.vertices[i].y));
                let j = (i + 1) % n;
                let b = self.snap.snap(&Point2::new(face.vertices[j].x, face.vertices[j].y));
                let (ka, kb) = (self.snap.key(&a), self.snap.key(&b));
                if ka == kb {
                    continue;
                }
                let key = SegmentKey::new(ka, kb);
                seen.entry(key).and_modify(|e| e.0 += 1).or_insert_with(|| {
                    order.push(key);
                    (1, (ka, kb, a, b))
                });
            }
        }

        order
            .iter()
            .filter_map(|k| seen.get(k))
            .filter(|e| e.0 == 1)
            .map(|e| e.1)
            .collect()
    }

    fn chain_loops(&self, edges: &[OutlineEdge]) -> Vec<Face> {
        let mut at_node: FxHashMap<PointKey, Vec<usize>> = FxHashMap::default();
        for (i, e) in edges.iter().enumerate() {
            at_node.entry(e.0).or_default().push(i);
            at_node.entry(e.1).or_default().push(i);
        }

        let mut used = vec![false; edges.len()];
        let mut loops = Vec::new();

        for start in 0..edges.len() {
            if used[start] {
                continue;
            }
            used[start] = true;
            let (origin, mut current, first, mut here) = edges[start];
            let mut points = vec![first];

            while current != origin {
                let next = at_node
                    .get(&current)
                    .and_then(|ids| ids.iter().copied().find(|&i| !used[i]));
                let Some(i) = next else {
                    break;
                };
                used[i] = true;
                points.push(here);
                let e = edges[i];
                if e.0 == current {
                    current = e.1;
                    here = e.3;
                } else {
                    current = e.0;
                    here = e.2;
                }
            }

            if current == origin {
                if let Some(face) = Face::from_loop(points, self.snap) {
                    loops.push(face);
                }
            }
        }
        loops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn quad(a: Point3, b: Point3, c: Point3, d: Point3) -> SolidFace {
        SolidFace::new(vec![a, b, c, d])
    }

    /// A 2×3×1 box.
    fn box_faces() -> Vec<SolidFace> {
        vec![
            quad(p(0.0, 0.0, 1.0), p(2.0, 0.0, 1.0), p(2.0, 3.0, 1.0), p(0.0, 3.0, 1.0)),
            quad(p(0.0, 0.0, 0.0), p(0.0, 3.0, 0.0), p(2.0, 3.0, 0.0), p(2.0, 0.0, 0.0)),
            quad(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 0.0, 1.0), p(0.0, 0.0, 1.0)),
            quad(p(2.0, 0.0, 0.0), p(2.0, 3.0, 0.0), p(2.0, 3.0, 1.0), p(2.0, 0.0, 1.0)),
            quad(p(2.0, 3.0, 0.0), p(0.0, 3.0, 0.0), p(0.0, 3.0, 1.0), p(2.0, 3.0, 1.0)),
            quad(p(0.0, 3.0, 0.0), p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0), p(0.0, 3.0, 1.0)),
        ]
    }

    #[test]
    fn newell_normal_of_floor_points_down() {
        let faces = box_faces();
        let n = faces[1].normal().unwrap_or_else(Vector3::zeros);
        assert!((n.z + 1.0).abs() < 1e-12);
        assert!(faces[2].normal().is_some_and(|n| n.z.abs() < 1e-12));
    }

    #[test]
    fn box_sections_at_its_floor() {
        let loops = SolidSection::new(&box_faces()).execute();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].points().len(), 4);
        assert!((loops[0].area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn shared_diagonal_is_dropped() {
        let faces = vec![
            SolidFace::new(vec![p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, 2.0, 0.0)]),
            SolidFace::new(vec![p(0.0, 0.0, 0.0), p(4.0, 2.0, 0.0), p(0.0, 2.0, 0.0)]),
        ];
        let loops = SolidSection::new(&faces).execute();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].points().len(), 4);
        assert!((loops[0].area() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn separate_floor_pieces_come_back_largest_first() {
        let faces = vec![
            quad(p(5.0, 0.0, 0.0), p(6.0, 0.0, 0.0), p(6.0, 1.0, 0.0), p(5.0, 1.0, 0.0)),
            quad(p(0.0, 0.0, 0.0), p(3.0, 0.0, 0.0), p(3.0, 3.0, 0.0), p(0.0, 3.0, 0.0)),
        ];
        let loops = SolidSection::new(&faces).execute();
        assert_eq!(loops.len(), 2);
        assert!((loops[0].area() - 9.0).abs() < 1e-9);
        assert!((loops[1].area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn walls_only_yield_nothing() {
        let faces: Vec<SolidFace> = box_faces().into_iter().skip(2).collect();
        assert!(SolidSection::new(&faces).execute().is_empty());
    }
}
