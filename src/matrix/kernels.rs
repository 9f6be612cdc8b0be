//! OpenCL ядро для матричного умножения
//!
//! Исходный код ядра лежит во внешнем файле и компилируется при запуске.

use crate::error::SetupError;
use std::ffi::CStr;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Путь к исходному коду ядра относительно рабочего каталога
pub const KERNEL_PATH: &str = "mult.cl";

/// Точка входа ядра: (A, B, C, M, N, K)
pub const KERNEL_ENTRY: &CStr = c"matrixMultiply";

/// Читает исходный код ядра
pub fn load_kernel_source(path: &Path) -> Result<String, SetupError> {
    let source = fs::read_to_string(path).map_err(|source| SetupError::KernelSource {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = source.len(), "kernel source loaded");
    Ok(source)
}
