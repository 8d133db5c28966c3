//! PTS Loader - `.pts` point cloud parser.
//!
//! Parses the plain-text `.pts` format (a point count line followed by
//! `x y z intensity r g b` rows) into packed records and hands them to the
//! import pipeline through [`PtsFileSource`], or to foreign callers through
//! the C ABI in [`clib`].
//!
//! # Example
//!
//! ```ignore
//! use pts_core::Importer;
//! use pts_loader::PtsFileSource;
//!
//! let importer = Importer::new(PtsFileSource::new());
//! let geometry = importer.import_point_cloud("scan.pts", &pts_math::Mat4::IDENTITY)?;
//! ```

pub mod clib;
pub mod parse;
pub mod source;

// Re-export commonly used types
pub use parse::{load_pts, parse_pts, PtsError, PtsResult};
pub use source::PtsFileSource;
