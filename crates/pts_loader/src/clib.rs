//! C ABI for hosts that load the parser as a shared library.
//!
//! ```c
//! bool pts_load_from_file(const char *path, uint8_t **out_buf, size_t *out_len);
//! void pts_free(uint8_t *buf, size_t len);
//! ```
//!
//! `out_buf` receives `out_len` packed 19-byte records. Every buffer returned
//! by a successful load must be passed to `pts_free` exactly once.

use std::ffi::{c_char, CStr};
use std::ptr;

use crate::parse::load_pts;
use crate::source::{free_raw, into_raw};

/// Parse the `.pts` file at `path`.
///
/// Returns `false` if any argument is null, the path is not UTF-8, or the
/// file cannot be parsed; the outputs are then set to null and zero. An
/// empty file returns `true` with a null buffer and zero length.
///
/// # Safety
///
/// `path` must be a valid NUL-terminated string. `out_buf` and `out_len`
/// must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn pts_load_from_file(
    path: *const c_char,
    out_buf: *mut *mut u8,
    out_len: *mut usize,
) -> bool {
    if out_buf.is_null() || out_len.is_null() {
        return false;
    }
    *out_buf = ptr::null_mut();
    *out_len = 0;

    if path.is_null() {
        return false;
    }
    let Ok(path) = CStr::from_ptr(path).to_str() else {
        log::error!("Point cloud path is not valid UTF-8");
        return false;
    };

    match load_pts(path) {
        Ok(points) => {
            *out_buf = into_raw(&points);
            *out_len = points.len();
            true
        }
        Err(e) => {
            log::error!("Failed to load {}: {}", path, e);
            false
        }
    }
}

/// Free a buffer returned by [`pts_load_from_file`].
///
/// # Safety
///
/// `buf` and `len` must be exactly the values written by one successful
/// `pts_load_from_file` call, and the buffer must not have been freed. A null
/// `buf` is ignored.
#[no_mangle]
pub unsafe extern "C" fn pts_free(buf: *mut u8, len: usize) {
    free_raw(buf, len);
}
