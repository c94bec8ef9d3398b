use thiserror::Error;

/// Top-level error type for the room tracing pipeline.
#[derive(Debug, Error)]
pub enum RoomtraceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Invalid export configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised while building or walking the half-edge arena.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("half-edge ring is inconsistent at node ({x}, {y})")]
    BrokenRing { x: f64, y: f64 },
}

/// Errors from the planar operations. Reconciliation failures are
/// recoverable: the view pipeline consumes them through its fallback chain.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("no glazing group touches the room boundary")]
    NoTouchingGlazing,

    #[error("no extracted face contains the test point ({x}, {y})")]
    NoEnclosingFace { x: f64, y: f64 },
}

/// Fatal failures at the document boundary.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene provider failed: {0}")]
    Provider(String),

    #[error("view {0} not found")]
    ViewNotFound(u64),

    #[error("output sink failed: {0}")]
    Sink(String),
}

/// Convenience type alias for results using [`RoomtraceError`].
pub type Result<T> = std::result::Result<T, RoomtraceError>;
