//! Ownership handoff with the external point cloud parser.
//!
//! A [`PointSource`] parses a file into a buffer it allocates itself and
//! hands back as a raw handle. That buffer must go back to the same source
//! exactly once. [`with_raw_buffer`] wraps the whole exchange: the buffer is
//! held by a `RawBuffer` guard for the duration of one call, the consumer
//! only ever sees a borrowed [`RecordSlice`], and the guard's `Drop` releases
//! the buffer on every exit path (including errors and panics).

use std::path::Path;
use std::ptr;

use crate::error::{ImportError, ImportResult};
use crate::record::{record_span, RecordSlice};

/// Result of asking a [`PointSource`] to parse a file.
///
/// `success == false` means the parse failed. `success == true` with
/// `count == 0` is a legitimately empty file.
#[derive(Debug, Clone, Copy)]
pub struct RawParse {
    /// Start of `count` packed records, or null
    pub handle: *mut u8,

    /// Number of records at `handle`
    pub count: usize,

    pub success: bool,
}

impl RawParse {
    /// A successful parse yielding `count` records at `handle`.
    pub fn ok(handle: *mut u8, count: usize) -> Self {
        Self {
            handle,
            count,
            success: true,
        }
    }

    /// A successful parse of an empty file.
    pub fn empty() -> Self {
        Self::ok(ptr::null_mut(), 0)
    }

    /// A failed parse with nothing allocated.
    pub fn failed() -> Self {
        Self {
            handle: ptr::null_mut(),
            count: 0,
            success: false,
        }
    }
}

/// An external parser that allocates record buffers.
///
/// Implementations need not be thread-safe; imports run on the calling
/// thread and never overlap on one source.
pub trait PointSource {
    /// Parse `path` into a packed record buffer.
    ///
    /// On success the handle must point at `count * RECORD_SIZE` readable
    /// bytes that stay valid until [`release`](PointSource::release).
    fn parse(&self, path: &Path) -> RawParse;

    /// Free a buffer previously returned by [`parse`](PointSource::parse).
    ///
    /// Called exactly once for every `parse`, including failed ones; a null
    /// handle must be accepted as a no-op.
    ///
    /// # Safety
    ///
    /// `handle` and `count` must be the values returned by one `parse` call on
    /// this source, and that buffer must not have been released already.
    unsafe fn release(&self, handle: *mut u8, count: usize);
}

/// Scoped ownership of one buffer returned by a [`PointSource`].
///
/// Releases the buffer when dropped.
pub(crate) struct RawBuffer<'s, S: PointSource + ?Sized> {
    source: &'s S,
    handle: *mut u8,
    count: usize,
}

impl<'s, S: PointSource + ?Sized> RawBuffer<'s, S> {
    /// Take ownership of a parse result.
    fn adopt(source: &'s S, parsed: &RawParse) -> Self {
        Self {
            source,
            handle: parsed.handle,
            count: parsed.count,
        }
    }

    /// Number of records declared by the source.
    fn len(&self) -> usize {
        self.count
    }

    /// Borrow the buffer as packed records.
    ///
    /// Fails with [`ImportError::RecordOverflow`] if the declared count cannot
    /// be addressed, before any byte is read. A null handle with records is
    /// rejected by [`with_raw_buffer`] before this is called.
    fn records(&self) -> ImportResult<RecordSlice<'_>> {
        if self.count == 0 {
            return Ok(RecordSlice::empty());
        }

        let span = record_span(self.count)?;
        debug_assert!(!self.handle.is_null());

        // SAFETY: the source guarantees `count * RECORD_SIZE` readable bytes at
        // `handle` until release, and release only happens in our Drop.
        let bytes = unsafe { std::slice::from_raw_parts(self.handle as *const u8, span) };
        RecordSlice::new(bytes, self.count)
    }
}

impl<S: PointSource + ?Sized> Drop for RawBuffer<'_, S> {
    fn drop(&mut self) {
        log::trace!("Releasing raw buffer of {} records", self.count);
        // SAFETY: handle/count came from a single parse on this source, and a
        // RawBuffer is never cloned, so this runs exactly once.
        unsafe {
            self.source.release(self.handle, self.count);
        }
    }
}

/// Parse `path` with `source`, run `consume` over the records, then release.
///
/// The distinction between a failed parse ([`ImportError::ParseFailed`]) and
/// an empty file (an empty [`RecordSlice`]) is preserved. `consume` runs at
/// most once, and the buffer is released exactly once whether it succeeds,
/// fails or panics.
pub fn with_raw_buffer<S, T, F>(source: &S, path: &Path, consume: F) -> ImportResult<T>
where
    S: PointSource + ?Sized,
    F: FnOnce(&RecordSlice<'_>) -> ImportResult<T>,
{
    let parsed = source.parse(path);
    let buffer = RawBuffer::adopt(source, &parsed);

    if !parsed.success {
        log::error!("Parser reported failure for {}", path.display());
        return Err(ImportError::ParseFailed {
            path: path.to_path_buf(),
        });
    }

    if parsed.handle.is_null() && parsed.count > 0 {
        log::error!(
            "Parser returned no buffer for {} records from {}",
            parsed.count,
            path.display()
        );
        return Err(ImportError::ParseFailed {
            path: path.to_path_buf(),
        });
    }

    log::debug!(
        "Acquired raw buffer of {} records from {}",
        buffer.len(),
        path.display()
    );

    let records = buffer.records()?;
    consume(&records)
}
