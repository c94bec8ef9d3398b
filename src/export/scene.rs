use std::collections::BTreeMap;

use crate::error::SceneError;
use crate::geometry::Segment;
use crate::math::{Point2, Point3};
use crate::operations::opening::OpeningRequest;
use crate::operations::section::SolidFace;

use super::group::ViewGroup;

/// What a projected line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentCategory {
    Wall,
    Glazing,
    /// Shaft or hole outlines, emitted separately from the boundary.
    Cutout,
    Other,
}

/// A projected line as delivered by the scene provider.
///
/// Endpoints are in the view plane; any `z` is dropped on conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedSegment {
    pub start: Point3,
    pub end: Point3,
    pub category: SegmentCategory,
    /// Glazing group id, `0` when ungrouped.
    pub glazing_group: u32,
    /// Element id of the hosting wall, if known.
    pub host: Option<u64>,
}

impl TaggedSegment {
    #[must_use]
    pub fn new(start: Point3, end: Point3, category: SegmentCategory) -> Self {
        Self {
            start,
            end,
            category,
            glazing_group: 0,
            host: None,
        }
    }

    /// A wall line in the view plane.
    #[must_use]
    pub fn wall(start: Point2, end: Point2) -> Self {
        Self::new(lift(&start), lift(&end), SegmentCategory::Wall)
    }

    /// A glazing line of `group` in the view plane.
    #[must_use]
    pub fn glazing(start: Point2, end: Point2, group: u32) -> Self {
        Self::new(lift(&start), lift(&end), SegmentCategory::Glazing).with_glazing_group(group)
    }

    /// A cutout line in the view plane.
    #[must_use]
    pub fn cutout(start: Point2, end: Point2) -> Self {
        Self::new(lift(&start), lift(&end), SegmentCategory::Cutout)
    }

    #[must_use]
    pub fn with_glazing_group(mut self, group: u32) -> Self {
        self.glazing_group = group;
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: u64) -> Self {
        self.host = Some(host);
        self
    }

    #[must_use]
    pub fn is_glazing(&self) -> bool {
        self.category == SegmentCategory::Glazing
    }

    /// Drops `z` and keeps the glazing tag.
    #[must_use]
    pub fn to_segment(&self) -> Segment {
        Segment::from_3d(&self.start, &self.end, self.is_glazing(), self.glazing_group)
    }
}

fn lift(p: &Point2) -> Point3 {
    Point3::new(p.x, p.y, 0.0)
}

/// A room as reported by the host document.
#[derive(Debug, Clone)]
pub struct RoomSource {
    pub id: u64,
    pub name: String,
    pub metadata: BTreeMap<String, String>,
    /// Reported boundary loops; glazing portions carry the glazing category.
    pub boundary: Vec<Vec<TaggedSegment>>,
    /// A point known to lie inside the room.
    pub test_point: Point2,
    /// Faces of the room solid, used only when no boundary loop survives.
    pub solid: Vec<SolidFace>,
}

impl RoomSource {
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, test_point: Point2) -> Self {
        Self {
            id,
            name: name.into(),
            metadata: BTreeMap::new(),
            boundary: Vec::new(),
            test_point,
            solid: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_loop(mut self, segments: Vec<TaggedSegment>) -> Self {
        self.boundary.push(segments);
        self
    }

    #[must_use]
    pub fn with_solid(mut self, faces: Vec<SolidFace>) -> Self {
        self.solid = faces;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Everything needed to export one sheet view.
#[derive(Debug, Clone, Default)]
pub struct ViewScene {
    pub id: u64,
    pub name: String,
    pub segments: Vec<TaggedSegment>,
    pub openings: Vec<OpeningRequest>,
    pub rooms: Vec<RoomSource>,
}

impl ViewScene {
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The host document, seen through the capabilities the export needs.
///
/// `begin_transient_changes` may alter the document (e.g. pin openings so
/// they project); every such change must be undone by
/// `revert_transient_changes`.
pub trait SceneProvider {
    /// Ids of the views to export, in output order.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::Provider` if the document cannot be queried.
    fn view_ids(&self) -> Result<Vec<u64>, SceneError>;

    /// Projects one view into a [`ViewScene`].
    ///
    /// # Errors
    ///
    /// Returns `SceneError::ViewNotFound` for an unknown id, or
    /// `SceneError::Provider` if extraction fails.
    fn load_view(&mut self, id: u64) -> Result<ViewScene, SceneError>;

    /// # Errors
    ///
    /// Returns `SceneError::Provider` if the document refuses the change.
    fn begin_transient_changes(&mut self) -> Result<(), SceneError>;

    /// # Errors
    ///
    /// Returns `SceneError::Provider` if the changes cannot be rolled back.
    fn revert_transient_changes(&mut self) -> Result<(), SceneError>;
}

/// Receives finished view groups, typically for serialization.
pub trait GroupSink {
    /// # Errors
    ///
    /// Returns `SceneError::Sink` when the group cannot be written. This
    /// aborts the export.
    fn accept(&mut self, group: ViewGroup) -> Result<(), SceneError>;
}

impl GroupSink for Vec<ViewGroup> {
    fn accept(&mut self, group: ViewGroup) -> Result<(), SceneError> {
        self.push(group);
        Ok(())
    }
}
