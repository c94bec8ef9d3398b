use crate::geometry::Segment;
use crate::math::{abs_cos, Point2, Vector2};

/// Where to look for glazing panel faces around an opening.
#[derive(Debug, Clone, Copy)]
pub struct PanelWindow {
    /// Half-window along the tangent.
    pub along: f64,
    /// Largest accepted normal offset.
    pub max_normal: f64,
    /// Minimum absolute cosine to the tangent.
    pub parallel_threshold: f64,
    /// Inferred panels thinner than this are rejected.
    pub min_thickness: f64,
}

/// Infers the inner and outer panel-face offsets of a glazing wall from the
/// glazing segments already collected next to an opening.
///
/// Only glazing lines count, and only those of the group whose line runs
/// closest to the opening center. Returns `(inner, outer)` as signed offsets
/// along `normal`, or `None` when fewer than two distinct faces are found
/// within the window or they are closer together than `min_thickness`.
pub fn sample_panel_offsets(
    center: &Point2,
    tangent: &Vector2,
    normal: &Vector2,
    segments: &[Segment],
    window: &PanelWindow,
) -> Option<(f64, f64)> {
    let candidates: Vec<(f64, u32)> = segments
        .iter()
        .filter(|seg| seg.is_glazing())
        .filter(|seg| abs_cos(&seg.direction(), tangent) >= window.parallel_threshold)
        .filter_map(|seg| {
            let a = seg.start() - center;
            let b = seg.end() - center;
            let (ta, tb) = (a.dot(tangent), b.dot(tangent));
            if ta.max(tb) < -window.along || ta.min(tb) > window.along {
                return None;
            }
            let offset = 0.5 * (a.dot(normal) + b.dot(normal));
            (offset.abs() <= window.max_normal).then_some((offset, seg.group()))
        })
        .collect();

    let (_, group) = candidates
        .iter()
        .copied()
        .min_by(|x, y| x.0.abs().total_cmp(&y.0.abs()))?;

    let mut inner: Option<f64> = None;
    let mut outer: Option<f64> = None;
    for (offset, _) in candidates.into_iter().filter(|c| c.1 == group) {
        inner = Some(inner.map_or(offset, |v| v.min(offset)));
        outer = Some(outer.map_or(offset, |v| v.max(offset)));
    }

    let (inner, outer) = inner.zip(outer)?;
    (outer - inner >= window.min_thickness).then_some((inner, outer))
}
