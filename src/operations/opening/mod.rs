mod hits;
mod panel;

pub use hits::{nearest_hits_along_line, LineHits};
pub use panel::{sample_panel_offsets, PanelWindow};

use tracing::{debug, trace};

use crate::config::ExportConfig;
use crate::error::GeometryError;
use crate::geometry::{Segment, SegmentSet};
use crate::math::{Point2, Vector2, TOLERANCE};

/// The kind of wall an opening is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningContext {
    /// An ordinary (opaque) wall.
    Wall,
    /// A glazing (curtain) wall.
    Glazing,
}

/// A door or opening whose host wall lines must be resealed.
///
/// `tangent` runs along the host wall and `normal` across it, pointing to
/// the wall's outer side. Both are unit vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningRequest {
    pub center: Point2,
    pub tangent: Vector2,
    pub normal: Vector2,
    pub half_thickness: f64,
    pub context: OpeningContext,
}

impl OpeningRequest {
    /// Creates a request, normalizing `tangent` and deriving the normal as
    /// its left perpendicular.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` for a zero tangent.
    pub fn new(
        center: Point2,
        tangent: Vector2,
        half_thickness: f64,
        context: OpeningContext,
    ) -> Result<Self, GeometryError> {
        let tangent = tangent.try_normalize(TOLERANCE).ok_or(GeometryError::ZeroVector)?;
        Ok(Self {
            center,
            tangent,
            normal: Vector2::new(-tangent.y, tangent.x),
            half_thickness,
            context,
        })
    }

    /// Replaces the normal (e.g. to point it outward).
    #[must_use]
    pub fn with_normal(mut self, normal: Vector2) -> Self {
        if let Some(n) = normal.try_normalize(TOLERANCE) {
            self.normal = n;
        }
        self
    }
}

/// Where the two closing-line offsets came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSource {
    /// `±half_thickness` of an ordinary wall.
    WallThickness,
    /// Inner/outer panel faces sampled from nearby glazing lines.
    SampledPanels,
    /// Nominal half-thickness with the outer line shifted outward.
    NominalGlazing,
}

/// Result of resolving one opening.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningOutcome {
    /// Closing segments produced (0, 1 or 2).
    pub closing: Vec<Segment>,
    /// Sides for which no hit could be resolved.
    pub missed_sides: usize,
    pub offsets: OffsetSource,
}

/// Reseals a host wall across a door or opening.
///
/// For each of the two wall-face offsets a line is cast along the tangent;
/// the nearest hits on both sides bound one closing segment. When the local
/// search fails, a cast from the opening center against the whole set is
/// offset onto that face instead.
#[derive(Debug)]
pub struct OpeningBridge<'a> {
    request: &'a OpeningRequest,
    config: ExportConfig,
}

impl<'a> OpeningBridge<'a> {
    #[must_use]
    pub fn new(request: &'a OpeningRequest) -> Self {
        Self {
            request,
            config: ExportConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: &ExportConfig) -> Self {
        self.config = *config;
        self
    }

    /// Computes the closing segments and inserts them into `segments`.
    pub fn execute(&self, segments: &mut SegmentSet) -> OpeningOutcome {
        let outcome = self.resolve(segments.segments());
        for seg in &outcome.closing {
            segments.insert(seg);
        }
        outcome
    }

    /// Computes the closing segments against `segments` without inserting them.
    #[must_use]
    pub fn resolve(&self, segments: &[Segment]) -> OpeningOutcome {
        let req = self.request;
        let cfg = &self.config;
        let (offsets, source) = self.face_offsets(segments);
        let eps = cfg.min_segment_length;

        let reach = cfg.opening_search_radius;
        let local: Vec<&Segment> = segments
            .iter()
            .filter(|s| {
                let (lo, hi) = s.bounds();
                lo.x <= req.center.x + reach
                    && hi.x >= req.center.x - reach
                    && lo.y <= req.center.y + reach
                    && hi.y >= req.center.y - reach
            })
            .collect();

        let mut center_hits: Option<LineHits> = None;
        let mut closing = Vec::new();
        let mut missed_sides = 0;

        for offset in offsets {
            let shift = req.normal * offset;
            let origin = req.center + shift;
            let direct = nearest_hits_along_line(&origin, &req.tangent, local.iter().copied(), eps);

            let span = if let Some((neg, pos)) = direct.both() {
                Some((origin + req.tangent * neg, origin + req.tangent * pos))
            } else {
                let from_center = *center_hits.get_or_insert_with(|| {
                    nearest_hits_along_line(&req.center, &req.tangent, segments, eps)
                });
                from_center.both().map(|(neg, pos)| {
                    (
                        req.center + req.tangent * neg + shift,
                        req.center + req.tangent * pos + shift,
                    )
                })
            };

            match span {
                Some((a, b)) => closing.push(Segment::new(a, b)),
                None => {
                    missed_sides += 1;
                    trace!(offset, x = req.center.x, y = req.center.y, "opening side left open");
                }
            }
        }

        debug!(
            closing = closing.len(),
            missed_sides,
            source = ?source,
            "resolved opening"
        );
        OpeningOutcome {
            closing,
            missed_sides,
            offsets: source,
        }
    }

    /// Signed normal offsets of the two wall faces.
    fn face_offsets(&self, segments: &[Segment]) -> ([f64; 2], OffsetSource) {
        let req = self.request;
        let cfg = &self.config;
        let h = req.half_thickness.abs();
        match req.context {
            OpeningContext::Wall => ([-h, h], OffsetSource::WallThickness),
            OpeningContext::Glazing => {
                let window = PanelWindow {
                    along: cfg.glazing_sample_along,
                    max_normal: cfg.glazing_sample_max_normal,
                    parallel_threshold: cfg.parallel_threshold,
                    min_thickness: cfg.min_panel_thickness,
                };
                let sampled =
                    sample_panel_offsets(&req.center, &req.tangent, &req.normal, segments, &window);
                match sampled {
                    Some((inner, outer)) => ([inner, outer], OffsetSource::SampledPanels),
                    None => ([-h, h + cfg.opening_outer_shift], OffsetSource::NominalGlazing),
                }
            }
        }
    }
}
