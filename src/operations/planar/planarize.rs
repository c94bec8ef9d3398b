use tracing::trace;

use crate::config::ExportConfig;
use crate::geometry::{Segment, SegmentSet, Snap};
use crate::math::distance_2d::point_to_line_dist;
use crate::math::intersect_2d::segment_segment_params;

/// Split parameters closer than this are merged.
const PARAM_MERGE: f64 = 1e-9;

/// A set of segments that meet only at shared endpoints.
///
/// Produced by [`Planarize`]; no two edges cross transversally or overlap
/// partially.
#[derive(Debug, Clone)]
pub struct Arrangement {
    set: SegmentSet,
}

impl Arrangement {
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        self.set.segments()
    }

    #[must_use]
    pub fn snap(&self) -> Snap {
        self.set.snap()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    #[must_use]
    pub fn into_segments(self) -> Vec<Segment> {
        self.set.into_segments()
    }
}

/// Splits a segment soup at every crossing, touch and collinear overlap.
///
/// The pairwise test is quadratic; callers pass spatially relevant subsets.
#[derive(Debug)]
pub struct Planarize<'a> {
    segments: &'a [Segment],
    eps: f64,
    snap_pitch: f64,
    min_length: f64,
}

impl<'a> Planarize<'a> {
    /// Creates a planarize operation with default tolerances.
    #[must_use]
    pub fn new(segments: &'a [Segment]) -> Self {
        let defaults = ExportConfig::default();
        Self {
            segments,
            eps: defaults.planarize_eps,
            snap_pitch: defaults.snap_pitch,
            min_length: defaults.min_segment_length,
        }
    }

    /// Takes distance tolerance, snap pitch and minimum length from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &ExportConfig) -> Self {
        self.eps = config.planarize_eps;
        self.snap_pitch = config.snap_pitch;
        self.min_length = config.min_segment_length;
        self
    }

    /// Sets the distance tolerance for intersection and collinearity tests.
    #[must_use]
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Runs the split and returns the resulting arrangement.
    #[must_use]
    pub fn execute(&self) -> Arrangement {
        let mut splits: Vec<Vec<f64>> = vec![vec![0.0, 1.0]; self.segments.len()];

        for i in 0..self.segments.len() {
            for j in (i + 1)..self.segments.len() {
                let a = &self.segments[i];
                let b = &self.segments[j];
                if !a.bounds_overlap(b, self.eps) {
                    continue;
                }
                self.record_splits(a, b, i, j, &mut splits);
            }
        }

        let mut set = SegmentSet::new(self.snap_pitch, self.min_length);
        for (seg, params) in self.segments.iter().zip(splits.iter_mut()) {
            params.sort_by(f64::total_cmp);
            params.dedup_by(|x, y| (*x - *y).abs() < PARAM_MERGE);

            for w in params.windows(2) {
                let p0 = seg.point_at(w[0]);
                let p1 = seg.point_at(w[1]);
                if (p1 - p0).norm() < self.min_length {
                    continue;
                }
                set.try_add(p0, p1, seg.is_glazing(), seg.group());
            }
        }

        trace!(
            input = self.segments.len(),
            output = set.len(),
            "planarized segment set"
        );
        Arrangement { set }
    }

    fn record_splits(&self, a: &Segment, b: &Segment, i: usize, j: usize, splits: &mut [Vec<f64>]) {
        let (a0, a1) = (a.start(), a.end());
        let (b0, b1) = (b.start(), b.end());
        let len_a = a.length();
        let len_b = b.length();
        if len_a <= 0.0 || len_b <= 0.0 {
            return;
        }
        let ta = self.eps / len_a;
        let tb = self.eps / len_b;

        if let Some((t, u)) = segment_segment_params(&a0, &a1, &b0, &b1) {
            if (-ta..=1.0 + ta).contains(&t) && (-tb..=1.0 + tb).contains(&u) {
                splits[i].push(t.clamp(0.0, 1.0));
                splits[j].push(u.clamp(0.0, 1.0));
            }
            return;
        }

        // Parallel: only collinear pairs touch or overlap.
        if point_to_line_dist(&b0, &a0, &a1) > self.eps
            || point_to_line_dist(&b1, &a0, &a1) > self.eps
        {
            return;
        }
        for q in [b0, b1] {
            let t = (q - a0).dot(&a.direction()) / (len_a * len_a);
            if (-ta..=1.0 + ta).contains(&t) {
                splits[i].push(t.clamp(0.0, 1.0));
            }
        }
        for q in [a0, a1] {
            let u = (q - b0).dot(&b.direction()) / (len_b * len_b);
            if (-tb..=1.0 + tb).contains(&u) {
                splits[j].push(u.clamp(0.0, 1.0));
            }
        }
    }
}
