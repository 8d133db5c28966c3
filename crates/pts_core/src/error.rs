//! Error types for the import pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while importing a point cloud.
///
/// An empty file is not an error: it imports as a zero-length
/// [`PointGeometry`](crate::PointGeometry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// A record index outside `0..count` was decoded. This is a bug in the
    /// caller, never a property of the input file.
    #[error("record index {index} out of range for buffer of {count} records")]
    OutOfRange { index: usize, count: usize },

    #[error("record count {count} is too large to address")]
    RecordOverflow { count: usize },

    #[error("record buffer holds {available} bytes but {count} records were declared")]
    Truncated { count: usize, available: usize },

    #[error("failed to parse point cloud: {}", path.display())]
    ParseFailed { path: PathBuf },
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;
