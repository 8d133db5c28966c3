//! In-process [`PointSource`] backed by the `.pts` parser.
//!
//! Buffers are allocated here and handed out as raw pointers, the same way
//! they cross the C ABI, so the import pipeline exercises the real ownership
//! handoff whether it is called from Rust or from a foreign host.

use std::cell::RefCell;
use std::path::Path;
use std::ptr;

use pts_core::record::encode_records;
use pts_core::{PointSource, RawParse, RawPointRecord, RECORD_SIZE};

use crate::parse::{load_pts, PtsError};

/// Parses `.pts` files for [`pts_core::Importer`].
///
/// The most recent parse error is kept for diagnostics, since the raw
/// handoff can only report success or failure.
#[derive(Debug, Default)]
pub struct PtsFileSource {
    last_error: RefCell<Option<PtsError>>,
}

impl PtsFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the error from the last failed parse, if any.
    pub fn take_last_error(&self) -> Option<PtsError> {
        self.last_error.borrow_mut().take()
    }
}

impl PointSource for PtsFileSource {
    fn parse(&self, path: &Path) -> RawParse {
        match load_pts(path) {
            Ok(points) => {
                *self.last_error.borrow_mut() = None;
                let count = points.len();
                RawParse::ok(into_raw(&points), count)
            }
            Err(e) => {
                log::error!("Failed to parse {}: {}", path.display(), e);
                *self.last_error.borrow_mut() = Some(e);
                RawParse::failed()
            }
        }
    }

    unsafe fn release(&self, handle: *mut u8, count: usize) {
        free_raw(handle, count);
    }
}

/// Encode `points` into a heap buffer and give up ownership of it.
///
/// Returns null for an empty slice. The buffer must be returned to
/// [`free_raw`] with the same count.
pub(crate) fn into_raw(points: &[RawPointRecord]) -> *mut u8 {
    if points.is_empty() {
        return ptr::null_mut();
    }
    let bytes = encode_records(points).into_boxed_slice();
    Box::into_raw(bytes) as *mut u8
}

/// Reclaim a buffer produced by [`into_raw`].
///
/// # Safety
///
/// `handle` must be null or come from `into_raw` with `count` points, and
/// must not have been freed already.
pub(crate) unsafe fn free_raw(handle: *mut u8, count: usize) {
    if handle.is_null() {
        return;
    }
    let Some(len) = count.checked_mul(RECORD_SIZE) else {
        log::error!("Refusing to free buffer with unaddressable count {}", count);
        return;
    };
    drop(Box::from_raw(ptr::slice_from_raw_parts_mut(handle, len)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pts_core::{ImportError, Importer, IndexWidth, RecordSlice};
    use pts_math::{Mat4, Vec3};
    use std::fs;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("pts_source_{}_{}.pts", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_raw_round_trip() {
        let points = vec![
            RawPointRecord::new(Vec3::new(1.0, 2.0, 3.0), 4, [5, 6, 7]),
            RawPointRecord::new(Vec3::new(-1.0, 0.5, 9.0), -3, [255, 128, 0]),
        ];
        let handle = into_raw(&points);
        assert!(!handle.is_null());

        let bytes = unsafe { std::slice::from_raw_parts(handle, points.len() * RECORD_SIZE) };
        let records = RecordSlice::new(bytes, points.len()).unwrap();
        assert_eq!(records.iter().collect::<Vec<_>>(), points);

        unsafe { free_raw(handle, points.len()) };
    }

    #[test]
    fn test_empty_is_null() {
        let handle = into_raw(&[]);
        assert!(handle.is_null());
        unsafe { free_raw(handle, 0) };
    }

    #[test]
    fn test_source_parse_and_release() {
        let path = write_temp("ok", "2\n0 0 0 1 255 0 0\n1 1 1 1 0 0 255\n");
        let source = PtsFileSource::new();

        let parsed = source.parse(&path);
        assert!(parsed.success);
        assert_eq!(parsed.count, 2);
        assert!(!parsed.handle.is_null());
        unsafe { source.release(parsed.handle, parsed.count) };

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_source_failure_keeps_error() {
        let source = PtsFileSource::new();
        let parsed = source.parse(Path::new("definitely/missing.pts"));

        assert!(!parsed.success);
        assert!(parsed.handle.is_null());
        assert!(matches!(source.take_last_error(), Some(PtsError::Io(_))));
        assert!(source.take_last_error().is_none());
    }

    #[test]
    fn test_import_through_source() {
        let path = write_temp("import", "3\n0 0 0 5 255 0 0\n1 1 1 5 0 255 0\n2 2 2 5 0 0 255\n");
        let importer = Importer::new(PtsFileSource::new());
        let geometry = importer
            .import_point_cloud(&path, &Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();

        assert_eq!(
            geometry.positions,
            vec![
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(11.0, 1.0, 1.0),
                Vec3::new(12.0, 2.0, 2.0)
            ]
        );
        assert_eq!(geometry.colors, vec![Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(geometry.index_width(), IndexWidth::Narrow);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_import_parse_error() {
        let path = write_temp("bad", "2\n0 0 0 5 255 0 0\n1 1\n");
        let importer = Importer::new(PtsFileSource::new());
        let result = importer.import_point_cloud(&path, &Mat4::IDENTITY);

        assert!(matches!(result, Err(ImportError::ParseFailed { .. })));
        assert!(matches!(
            importer.source().take_last_error(),
            Some(PtsError::MissingField { line: 3, field: "z" })
        ));

        fs::remove_file(path).ok();
    }
}
