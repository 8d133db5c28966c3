//! PTS Core - point cloud import pipeline.
//!
//! This crate turns the packed record buffer produced by a point cloud
//! parser into a renderable point mesh:
//!
//! - **Record codec**: explicit little-endian decoding of 19-byte records
//! - **Color normalization**: 8-bit channels to `0..=1` floats
//! - **Geometry assembly**: positions, colors, identity point indices with
//!   a 16/32-bit index width chosen from the point count
//! - **Buffer lifecycle**: scoped ownership of the parser's raw buffer,
//!   released exactly once
//! - **Import**: the entry point used by the asset pipeline
//!
//! # Example
//!
//! ```ignore
//! use pts_core::{ImportSettings, Importer};
//! use pts_loader::PtsFileSource;
//!
//! let importer = Importer::new(PtsFileSource::new());
//! let geometry = importer.import_point_cloud("scan.pts", &ImportSettings::default().to_matrix())?;
//! println!("Imported {} points ({:?} indices)", geometry.len(), geometry.index_width());
//! ```

pub mod color;
pub mod error;
pub mod geometry;
pub mod import;
pub mod record;
pub mod settings;
pub mod source;

// Re-export commonly used types
pub use error::{ImportError, ImportResult};
pub use geometry::{assemble, IndexBuffer, IndexWidth, PointGeometry, PointVertex};
pub use import::Importer;
pub use record::{RawPointRecord, RecordSlice, RECORD_SIZE};
pub use settings::{ImportSettings, SettingsError};
pub use source::{with_raw_buffer, PointSource, RawParse};
