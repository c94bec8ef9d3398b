use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::error::{Result, SceneError};
use crate::geometry::{Face, Segment, SegmentSet, Snap};
use crate::math::polygon_2d::rotate_to_canonical_start;
use crate::operations::opening::OpeningBridge;
use crate::operations::planar::Planarize;
use crate::operations::reconcile::{glazing_runs, RoomReconciler};
use crate::operations::section::SolidSection;

use super::group::{
    rounded_loop, segment_pairs, BoundarySource, GlazingPath, RoomRecord, ViewDiagnostics,
    ViewGroup,
};
use super::scene::{GroupSink, RoomSource, SceneProvider, SegmentCategory, ViewScene};

/// Converts one projected view into its export group.
///
/// Openings are resolved against the host lines before anything is
/// planarized. Rooms are processed in input order and fall back from
/// glazing reconciliation to the raw loops and then to the solid section.
#[must_use]
pub fn process_view(scene: &ViewScene, config: &ExportConfig) -> ViewGroup {
    let mut diagnostics = ViewDiagnostics::default();

    let mut host = SegmentSet::from_config(config);
    let mut cutouts = host.empty_like();
    for tagged in &scene.segments {
        let seg = tagged.to_segment();
        match tagged.category {
            SegmentCategory::Cutout => cutouts.try_add(seg.start(), seg.end(), false, 0),
            _ => host.try_add(seg.start(), seg.end(), seg.is_glazing(), seg.group()),
        };
    }

    for request in &scene.openings {
        let outcome = OpeningBridge::new(request).with_config(config).execute(&mut host);
        if outcome.missed_sides == 0 {
            diagnostics.openings_resolved += 1;
        }
        diagnostics.opening_sides_missed += outcome.missed_sides;
    }

    let glazing: Vec<Segment> = host
        .segments()
        .iter()
        .filter(|s| s.is_glazing())
        .copied()
        .collect();
    let boundary = Planarize::new(host.segments()).with_config(config).execute();
    let cutout_lines = Planarize::new(cutouts.segments()).with_config(config).execute();

    let mut rooms = Vec::with_capacity(scene.rooms.len());
    for room in &scene.rooms {
        match trace_room(room, &glazing, config) {
            Some(record) => {
                diagnostics.count_room(record.source);
                rooms.push(record);
            }
            None => {
                diagnostics.rooms_dropped += 1;
                warn!(
                    room = room.id,
                    name = %room.name,
                    "room dropped: no boundary tier produced a loop"
                );
            }
        }
    }

    info!(
        view = scene.id,
        boundary = boundary.len(),
        cutouts = cutout_lines.len(),
        rooms = rooms.len(),
        dropped = diagnostics.rooms_dropped,
        "view processed"
    );

    let precision = config.output_precision;
    ViewGroup {
        view_id: scene.id,
        view_name: scene.name.clone(),
        boundary: segment_pairs(boundary.segments(), precision),
        cutouts: segment_pairs(cutout_lines.segments(), precision),
        rooms,
        diagnostics,
    }
}

/// Runs the room fallback chain. `None` means every tier failed.
fn trace_room(
    room: &RoomSource,
    view_glazing: &[Segment],
    config: &ExportConfig,
) -> Option<RoomRecord> {
    let precision = config.output_precision;
    let record = |source: BoundarySource, faces: Vec<Face>, glazing_paths: Vec<GlazingPath>| {
        RoomRecord {
            id: room.id,
            name: room.name.clone(),
            metadata: room.metadata.clone(),
            source,
            loops: faces
                .iter()
                .map(|f| rounded_loop(&rotate_to_canonical_start(f.points()), precision))
                .collect(),
            glazing_paths,
        }
    };

    let mut opaque = SegmentSet::from_config(config);
    for seg in room.boundary.iter().flatten().filter(|t| !t.is_glazing()) {
        opaque.insert(&seg.to_segment());
    }

    if !opaque.is_empty() {
        let nearby = glazing_near(room, view_glazing, config.room_glazing_margin);
        match RoomReconciler::new(opaque.segments(), &nearby, room.test_point)
            .with_config(config)
            .execute()
        {
            Ok(reconciled) => {
                let paths = glazing_runs(
                    reconciled.face.points(),
                    &nearby,
                    &reconciled.groups,
                    config.boundary_glazing_tolerance,
                )
                .into_iter()
                .map(|run| GlazingPath {
                    group: run.group,
                    points: rounded_loop(&run.points, precision),
                })
                .collect();
                return Some(record(BoundarySource::Reconciled, vec![reconciled.face], paths));
            }
            Err(e) => {
                debug!(room = room.id, error = %e, "reconciliation failed, using reported loops");
            }
        }
    }

    let raw = raw_loops(room, Snap::new(config.snap_pitch));
    if !raw.is_empty() {
        return Some(record(BoundarySource::RawLoops, raw, Vec::new()));
    }

    let section = SolidSection::new(&room.solid).with_config(config).execute();
    if !section.is_empty() {
        debug!(room = room.id, loops = section.len(), "room traced from its solid");
        return Some(record(BoundarySource::SolidSection, section, Vec::new()));
    }
    None
}

/// The reported loops as polygons, largest first.
fn raw_loops(room: &RoomSource, snap: Snap) -> Vec<Face> {
    let mut faces: Vec<Face> = room
        .boundary
        .iter()
        .filter_map(|segments| {
            let points = segments.iter().map(|t| t.to_segment().start()).collect();
            Face::from_loop(points, snap)
        })
        .collect();
    faces.sort_by(|a, b| b.area().total_cmp(&a.area()));
    faces
}

/// View glazing whose bounds come within `margin` of the room's boundary box.
fn glazing_near(room: &RoomSource, glazing: &[Segment], margin: f64) -> Vec<Segment> {
    let mut points = room
        .boundary
        .iter()
        .flatten()
        .flat_map(|t| {
            let s = t.to_segment();
            [s.start(), s.end()]
        })
        .chain(std::iter::once(room.test_point));
    let Some(first) = points.next() else {
        return Vec::new();
    };
    let (lo, hi) = points.fold((first, first), |(lo, hi), p| (lo.inf(&p), hi.sup(&p)));
    glazing
        .iter()
        .filter(|g| {
            let (glo, ghi) = g.bounds();
            glo.x <= hi.x + margin
                && ghi.x >= lo.x - margin
                && glo.y <= hi.y + margin
                && ghi.y >= lo.y - margin
        })
        .copied()
        .collect()
}

/// Totals over a whole export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub views: usize,
    pub diagnostics: ViewDiagnostics,
}

/// Exports every view a provider offers, inside one transient-change scope.
#[derive(Debug, Clone)]
pub struct ExportSession {
    config: ExportConfig,
}

impl ExportSession {
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Processes all views in provider order and hands each group to `sink`.
    ///
    /// Transient document changes are reverted whether the run succeeds or
    /// not.
    ///
    /// # Errors
    ///
    /// Returns `RoomtraceError::Config` for an invalid configuration (before
    /// the document is touched), and `RoomtraceError::Scene` when the
    /// provider or the sink fails. Either aborts the run.
    pub fn run<P, S>(&self, provider: &mut P, sink: &mut S) -> Result<ExportSummary>
    where
        P: SceneProvider + ?Sized,
        S: GroupSink + ?Sized,
    {
        self.config.validate()?;

        let mut scope = TransientScope::begin(provider)?;
        let mut summary = ExportSummary::default();

        let ids = scope.provider().view_ids()?;
        for id in ids {
            let scene = scope.provider().load_view(id)?;
            let group = process_view(&scene, &self.config);
            summary.views += 1;
            summary.diagnostics.absorb(&group.diagnostics);
            sink.accept(group)?;
        }

        scope.finish()?;
        info!(
            views = summary.views,
            dropped = summary.diagnostics.rooms_dropped,
            "export finished"
        );
        Ok(summary)
    }
}

/// Reverts the provider's transient changes when dropped.
struct TransientScope<'p, P: SceneProvider + ?Sized> {
    provider: &'p mut P,
    open: bool,
}

impl<'p, P: SceneProvider + ?Sized> TransientScope<'p, P> {
    fn begin(provider: &'p mut P) -> std::result::Result<Self, SceneError> {
        provider.begin_transient_changes()?;
        Ok(Self { provider, open: true })
    }

    fn provider(&mut self) -> &mut P {
        &mut *self.provider
    }

    fn finish(mut self) -> std::result::Result<(), SceneError> {
        self.open = false;
        self.provider.revert_transient_changes()
    }
}

impl<P: SceneProvider + ?Sized> Drop for TransientScope<'_, P> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.provider.revert_transient_changes() {
                warn!(error = %e, "failed to revert transient changes");
            }
        }
    }
}
