use std::collections::BTreeMap;

use serde::Serialize;

use crate::geometry::Segment;
use crate::math::polygon_2d::{round_point, strip_closing_duplicate};
use crate::math::Point2;

/// An output coordinate pair.
pub type XY = [f64; 2];

/// Which tier of the room fallback chain produced a room's loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundarySource {
    /// Closed against adjacent glazing.
    Reconciled,
    /// The reported boundary loops, unmodified.
    RawLoops,
    /// Sliced from the room solid.
    SolidSection,
}

/// The polygon path of one glazing group along a room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlazingPath {
    pub group: u32,
    pub points: Vec<XY>,
}

/// One exported room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomRecord {
    pub id: u64,
    pub name: String,
    pub metadata: BTreeMap<String, String>,
    pub source: BoundarySource,
    /// Closed loops, largest first, without a closing duplicate.
    pub loops: Vec<Vec<XY>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub glazing_paths: Vec<GlazingPath>,
}

/// Counters describing how a view was processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewDiagnostics {
    /// Openings sealed on both sides.
    pub openings_resolved: usize,
    /// Opening sides left open.
    pub opening_sides_missed: usize,
    pub rooms_reconciled: usize,
    pub rooms_raw: usize,
    pub rooms_section: usize,
    pub rooms_dropped: usize,
}

impl ViewDiagnostics {
    /// Adds another view's counters into this one.
    pub fn absorb(&mut self, other: &ViewDiagnostics) {
        self.openings_resolved += other.openings_resolved;
        self.opening_sides_missed += other.opening_sides_missed;
        self.rooms_reconciled += other.rooms_reconciled;
        self.rooms_raw += other.rooms_raw;
        self.rooms_section += other.rooms_section;
        self.rooms_dropped += other.rooms_dropped;
    }

    pub(crate) fn count_room(&mut self, source: BoundarySource) {
        match source {
            BoundarySource::Reconciled => self.rooms_reconciled += 1,
            BoundarySource::RawLoops => self.rooms_raw += 1,
            BoundarySource::SolidSection => self.rooms_section += 1,
        }
    }
}

/// The export output for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewGroup {
    pub view_id: u64,
    pub view_name: String,
    pub boundary: Vec<[XY; 2]>,
    pub cutouts: Vec<[XY; 2]>,
    pub rooms: Vec<RoomRecord>,
    pub diagnostics: ViewDiagnostics,
}

/// Rounds a point to `decimals` places.
#[must_use]
pub fn xy(p: &Point2, decimals: u32) -> XY {
    let r = round_point(p, decimals);
    [r.x, r.y]
}

/// Rounds both endpoints of each segment.
#[must_use]
pub fn segment_pairs(segments: &[Segment], decimals: u32) -> Vec<[XY; 2]> {
    segments
        .iter()
        .map(|s| [xy(&s.start(), decimals), xy(&s.end(), decimals)])
        .collect()
}

/// Rounds a polygon and removes the consecutive repeats rounding can create,
/// including a closing repeat of the first point.
#[must_use]
pub fn rounded_loop(points: &[Point2], decimals: u32) -> Vec<XY> {
    let mut rounded: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        let r = round_point(p, decimals);
        if rounded.last() != Some(&r) {
            rounded.push(r);
        }
    }
    strip_closing_duplicate(rounded, 0.0)
        .into_iter()
        .map(|p| [p.x, p.y])
        .collect()
}
