//! Point cloud import entry point.
//!
//! [`Importer`] composes the buffer lifecycle with geometry assembly and
//! reports a single outcome per file: either a complete [`PointGeometry`]
//! or an [`ImportError`]. A half-built geometry is never returned.

use std::path::Path;
use std::time::Instant;

use pts_math::Mat4;

use crate::error::ImportResult;
use crate::geometry::{assemble, PointGeometry};
use crate::settings::ImportSettings;
use crate::source::{with_raw_buffer, PointSource};

/// Imports point cloud files through a [`PointSource`].
///
/// One import runs to completion on the calling thread. Parallel imports are
/// only safe if the source itself is.
pub struct Importer<S: PointSource> {
    source: S,
}

impl<S: PointSource> Importer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying parser.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Import `path`, transforming every point by `transform`.
    ///
    /// An empty file imports as an empty geometry. The geometry is named
    /// after the file stem.
    pub fn import_point_cloud<P: AsRef<Path>>(
        &self,
        path: P,
        transform: &Mat4,
    ) -> ImportResult<PointGeometry> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed");

        let start = Instant::now();
        let result = with_raw_buffer(&self.source, path, |records| assemble(records, transform));

        match result {
            Ok(geometry) => {
                log::info!(
                    "Imported {} points from {} in {} ms ({:?} indices)",
                    geometry.len(),
                    path.display(),
                    start.elapsed().as_millis(),
                    geometry.index_width()
                );
                Ok(geometry.with_name(name))
            }
            Err(e) => {
                log::error!("Failed to import {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Import `path` placed by `settings`.
    pub fn import_with_settings<P: AsRef<Path>>(
        &self,
        path: P,
        settings: &ImportSettings,
    ) -> ImportResult<PointGeometry> {
        self.import_point_cloud(path, &settings.to_matrix())
    }
}
