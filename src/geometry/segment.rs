use crate::math::{Point2, Point3, Vector2};

/// Quantized coordinates of a snapped point.
///
/// Two points map to the same key exactly when they snap to the same grid
/// node, so the key doubles as a node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    pub x: i64,
    pub y: i64,
}

/// Order-independent identity of a segment: its two endpoint keys, sorted
/// lexicographically by X then Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentKey {
    pub lo: PointKey,
    pub hi: PointKey,
}

impl SegmentKey {
    /// Builds the key for an (unordered) pair of endpoint keys.
    #[must_use]
    pub fn new(a: PointKey, b: PointKey) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }
}

/// Coordinate snapping grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pitch: f64,
}

impl Snap {
    /// Creates a grid with the given pitch. Non-positive pitches fall back to
    /// a fine `1e-9` grid so keys stay well defined.
    #[must_use]
    pub fn new(pitch: f64) -> Self {
        let pitch = if pitch > 0.0 { pitch } else { 1e-9 };
        Self { pitch }
    }

    /// Grid pitch.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Snaps a point to the nearest grid node.
    #[must_use]
    pub fn snap(&self, p: &Point2) -> Point2 {
        Point2::new(
            (p.x / self.pitch).round() * self.pitch,
            (p.y / self.pitch).round() * self.pitch,
        )
    }

    /// Quantized key of the grid node nearest to `p`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn key(&self, p: &Point2) -> PointKey {
        PointKey {
            x: (p.x / self.pitch).round() as i64,
            y: (p.y / self.pitch).round() as i64,
        }
    }

    /// Canonical key of the segment `a`→`b`.
    #[must_use]
    pub fn segment_key(&self, a: &Point2, b: &Point2) -> SegmentKey {
        SegmentKey::new(self.key(a), self.key(b))
    }
}

/// A 2D line segment tagged with its glazing membership.
///
/// Segments are value objects: once built they are never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    start: Point2,
    end: Point2,
    is_glazing: bool,
    group: u32,
}

impl Segment {
    /// Creates an untagged (opaque) segment.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            start,
            end,
            is_glazing: false,
            group: 0,
        }
    }

    /// Creates a segment with explicit glazing flag and group id
    /// (`0` = not grouped).
    #[must_use]
    pub fn tagged(start: Point2, end: Point2, is_glazing: bool, group: u32) -> Self {
        Self {
            start,
            end,
            is_glazing,
            group,
        }
    }

    /// Creates a glazing segment belonging to `group`.
    #[must_use]
    pub fn glazing(start: Point2, end: Point2, group: u32) -> Self {
        Self::tagged(start, end, true, group)
    }

    /// Projects 3D endpoints into the XY plane (z is dropped).
    #[must_use]
    pub fn from_3d(start: &Point3, end: &Point3, is_glazing: bool, group: u32) -> Self {
        Self::tagged(start.xy(), end.xy(), is_glazing, group)
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.end
    }

    #[must_use]
    pub fn is_glazing(&self) -> bool {
        self.is_glazing
    }

    /// Glazing group id, `0` when the segment is not grouped.
    #[must_use]
    pub fn group(&self) -> u32 {
        self.group
    }

    /// Copy of this segment with new endpoints and the same tags.
    #[must_use]
    pub fn with_endpoints(&self, start: Point2, end: Point2) -> Self {
        Self { start, end, ..*self }
    }

    /// Unnormalized direction `end - start`.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.end - self.start
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.start, &self.end)
    }

    /// Point at parameter `t` (`0` = start, `1` = end).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.start + self.direction() * t
    }

    /// Axis-aligned bounds as `(min, max)`.
    #[must_use]
    pub fn bounds(&self) -> (Point2, Point2) {
        (
            Point2::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y)),
            Point2::new(self.start.x.max(self.end.x), self.start.y.max(self.end.y)),
        )
    }

    /// Whether the bounding boxes of `self` and `other` overlap once both are
    /// grown by `eps`.
    #[must_use]
    pub fn bounds_overlap(&self, other: &Segment, eps: f64) -> bool {
        let (a_min, a_max) = self.bounds();
        let (b_min, b_max) = other.bounds();
        a_min.x <= b_max.x + eps
            && b_min.x <= a_max.x + eps
            && a_min.y <= b_max.y + eps
            && b_min.y <= a_max.y + eps
    }
}
