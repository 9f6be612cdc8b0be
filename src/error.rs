//! Ошибки подготовки и выполнения вычислений на OpenCL

use crate::opencl::types::{cl_build_status, cl_int, error_name};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Неудачный вызов OpenCL API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClError {
    /// Имя функции OpenCL
    pub call: &'static str,
    /// Код возврата
    pub code: cl_int,
}

impl fmt::Display for ClError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match error_name(self.code) {
            Some(name) => write!(f, "{} failed: {} ({})", self.call, name, self.code),
            None => write!(f, "{} failed: OpenCL error code {}", self.call, self.code),
        }
    }
}

impl std::error::Error for ClError {}

/// Фатальные ошибки этапа подготовки устройства
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("OpenCL runtime is not available: {0}")]
    LibraryUnavailable(#[from] libloading::Error),

    #[error("No platforms found!")]
    NoPlatforms,

    #[error("No devices found!")]
    NoDevices,

    #[error("cannot read kernel source {}: {source}", path.display())]
    KernelSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("kernel build failed with status {status}")]
    Build { status: cl_build_status, log: String },

    #[error(transparent)]
    Cl(#[from] ClError),
}

/// Несогласованные размеры матриц A (M×K), B (K×N) и C (M×N)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("shape mismatch: A is {a:?}, B is {b:?}, C is {c:?}")]
pub struct ShapeMismatch {
    pub a: (usize, usize),
    pub b: (usize, usize),
    pub c: (usize, usize),
}

/// Ошибки отдельного запуска ядра
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Shape(#[from] ShapeMismatch),

    #[error("dimension {name} = {value} does not fit the kernel's unsigned int parameter")]
    DimensionOverflow { name: &'static str, value: usize },

    #[error(transparent)]
    Cl(#[from] ClError),
}

pub type Result<T, E = SetupError> = std::result::Result<T, E>;
