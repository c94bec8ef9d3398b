use rustc_hash::FxHashSet;

use crate::config::ExportConfig;
use crate::math::Point2;

use super::segment::{Segment, SegmentKey, Snap};

/// Running, deduplicated collection of snapped segments.
///
/// Every insertion goes through [`SegmentSet::try_add`]: too-short segments
/// are rejected, endpoints are snapped to the grid, and a segment whose
/// canonical key is already present is ignored regardless of endpoint order.
#[derive(Debug, Clone)]
pub struct SegmentSet {
    segments: Vec<Segment>,
    keys: FxHashSet<SegmentKey>,
    snap: Snap,
    min_length: f64,
}

impl SegmentSet {
    /// Creates an empty set with the given snap pitch and minimum length.
    #[must_use]
    pub fn new(snap_pitch: f64, min_length: f64) -> Self {
        Self {
            segments: Vec::new(),
            keys: FxHashSet::default(),
            snap: Snap::new(snap_pitch),
            min_length,
        }
    }

    /// Creates an empty set using the pitch and minimum length of `config`.
    #[must_use]
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.snap_pitch, config.min_segment_length)
    }

    /// Creates an empty set sharing this set's snapping parameters.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self::new(self.snap.pitch(), self.min_length)
    }

    /// Adds the segment `a`→`b` if it is long enough and not yet present.
    ///
    /// Returns `false` without touching the set when the segment is shorter
    /// than the minimum length before or after snapping, or duplicates an
    /// existing key.
    pub fn try_add(&mut self, a: Point2, b: Point2, is_glazing: bool, group: u32) -> bool {
        if (b - a).norm() < self.min_length {
            return false;
        }
        let sa = self.snap.snap(&a);
        let sb = self.snap.snap(&b);
        // Snapping may shorten the segment by up to a pitch per axis.
        if (sb - sa).norm() < self.min_length {
            return false;
        }
        let key = self.snap.segment_key(&sa, &sb);
        if key.lo == key.hi || self.keys.contains(&key) {
            return false;
        }
        self.keys.insert(key);
        let segment = Segment::tagged(sa, sb, is_glazing, group);
        self.segments.push(segment);
        true
    }

    /// Adds an existing segment, keeping its tags.
    pub fn insert(&mut self, segment: &Segment) -> bool {
        self.try_add(
            segment.start(),
            segment.end(),
            segment.is_glazing(),
            segment.group(),
        )
    }

    /// Adds every segment of `segments`, returning how many were new.
    pub fn extend_from(&mut self, segments: &[Segment]) -> usize {
        segments.iter().filter(|s| self.insert(s)).count()
    }

    /// Whether a segment with the same canonical key is present.
    #[must_use]
    pub fn contains(&self, a: &Point2, b: &Point2) -> bool {
        let key = self
            .snap
            .segment_key(&self.snap.snap(a), &self.snap.snap(b));
        self.keys.contains(&key)
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    #[must_use]
    pub fn snap(&self) -> Snap {
        self.snap
    }

    #[must_use]
    pub fn min_length(&self) -> f64 {
        self.min_length
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn short_segments_are_rejected() {
        let mut set = SegmentSet::new(1e-4, 0.01);
        assert!(!set.try_add(p(0.0, 0.0), p(0.005, 0.0), false, 0));
        assert!(set.is_empty());
    }

    #[test]
    fn segment_shortened_by_snapping_is_rejected() {
        let mut set = SegmentSet::new(1e-4, 1e-3);
        let a = p(0.000_050_000_1, 0.000_050_000_1);
        let b = a + crate::math::Vector2::new(0.000_699_99, 0.000_715);
        assert!((b - a).norm() >= 1e-3);
        assert!(!set.try_add(a, b, false, 0));
        assert!(set.is_empty());
    }

    #[test]
    fn kept_segments_are_never_shorter_than_the_minimum() {
        let mut set = SegmentSet::new(1e-4, 1e-3);
        for i in 0..200 {
            let t = f64::from(i) * 0.013_7;
            let a = p(t.sin() * 0.37, t.cos() * 0.21);
            let b = a + crate::math::Vector2::new(0.000_3 + 0.000_007 * f64::from(i), 0.000_95);
            set.try_add(a, b, false, 0);
        }
        assert!(set.segments().iter().all(|s| s.length() >= 1e-3));
    }

    #[test]
    fn reversed_duplicate_is_a_no_op() {
        let mut set = SegmentSet::new(1e-4, 1e-3);
        assert!(set.try_add(p(0.0, 0.0), p(5.0, 0.0), false, 0));
        assert!(!set.try_add(p(5.0, 0.0), p(0.0, 0.0), true, 3));
        assert_eq!(set.len(), 1);
        assert!(!set.segments()[0].is_glazing());
    }

    #[test]
    fn near_duplicate_merges_through_snapping() {
        let mut set = SegmentSet::new(1e-3, 1e-3);
        assert!(set.try_add(p(0.0, 0.0), p(5.0, 0.0), false, 0));
        assert!(!set.try_add(p(0.000_2, -0.000_1), p(4.999_8, 0.000_3), false, 0));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&p(5.0, 0.0), &p(0.0, 0.0)));
    }

    #[test]
    fn endpoints_are_snapped() {
        let mut set = SegmentSet::new(0.1, 1e-3);
        assert!(set.try_add(p(0.04, 0.0), p(2.96, 1.01), true, 4));
        let s = set.segments()[0];
        assert!((s.start().x).abs() < 1e-12);
        assert!((s.end().x - 3.0).abs() < 1e-12);
        assert!((s.end().y - 1.0).abs() < 1e-12);
        assert!(s.is_glazing());
        assert_eq!(s.group(), 4);
    }

    #[test]
    fn extend_counts_new_segments() {
        let mut set = SegmentSet::new(1e-4, 1e-3);
        let segs = vec![
            Segment::new(p(0.0, 0.0), p(1.0, 0.0)),
            Segment::new(p(1.0, 0.0), p(0.0, 0.0)),
            Segment::new(p(1.0, 0.0), p(1.0, 1.0)),
            Segment::new(p(1.0, 1.0), p(1.0, 1.000_01)),
        ];
        assert_eq!(set.extend_from(&segs), 2);
    }
}
