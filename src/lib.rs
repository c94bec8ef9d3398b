pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod topology;

pub use config::ExportConfig;
pub use error::{Result, RoomtraceError};
