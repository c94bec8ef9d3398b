//! Per-view export: scene input, the room tracing pipeline, and its output
//! groups.

pub mod group;
pub mod pipeline;
pub mod scene;

pub use group::{BoundarySource, GlazingPath, RoomRecord, ViewDiagnostics, ViewGroup};
pub use pipeline::{process_view, ExportSession, ExportSummary};
pub use scene::{GroupSink, RoomSource, SceneProvider, SegmentCategory, TaggedSegment, ViewScene};
