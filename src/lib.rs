//! Сравнение производительности целочисленного умножения матриц на CPU и GPU (OpenCL)

// Реэкспортируем макросы на уровень крейта
#[macro_use]
mod macros {
    /// Вызов OpenCL, возвращающий код ошибки, превращается в `Result<(), ClError>`
    #[macro_export]
    macro_rules! cl_check {
        ($call:literal, $expr:expr) => {{
            #[allow(unused_unsafe)]
            let code = unsafe { $expr };
            $crate::opencl::utils::check($call, code)
        }};
    }

    /// Вызов OpenCL, создающий объект и сообщающий код ошибки через `errcode_ret`
    #[macro_export]
    macro_rules! cl_create {
        ($call:literal, |$err:ident| $expr:expr) => {{
            let mut $err: $crate::opencl::types::cl_int = $crate::opencl::types::CL_SUCCESS;
            #[allow(unused_unsafe)]
            let obj = unsafe { $expr };
            $crate::opencl::utils::created($call, obj, $err)
        }};
    }
}

pub mod error;
pub mod gpu;
pub mod matrix;
pub mod opencl;
pub mod report;
pub mod utils;

// Реэкспорт основных типов для удобства
pub use error::{ClError, DispatchError, SetupError, ShapeMismatch};
pub use gpu::{gpu_matrix_multiply, GpuSetup};
pub use matrix::{Dims, Fill, Matrix, Workload};
