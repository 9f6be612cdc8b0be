//! Владение объектами OpenCL

use super::bindings::ReleaseFn;
use super::types::{cl_int, CL_SUCCESS};
use std::ffi::c_void;
use tracing::warn;

/// Объект OpenCL, освобождаемый соответствующей функцией `clRelease*` при удалении.
///
/// Не должен переживать [`OpenCl`](super::OpenCl), из которого получена функция освобождения.
pub struct Handle {
    raw: *mut c_void,
    release: ReleaseFn,
}

impl Handle {
    pub fn new(raw: *mut c_void, release: ReleaseFn) -> Self {
        Self { raw, release }
    }

    pub fn raw(&self) -> *mut c_void {
        self.raw
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        let code: cl_int = unsafe { (self.release)(self.raw) };
        if code != CL_SUCCESS {
            warn!(code, "failed to release OpenCL object");
        }
    }
}
