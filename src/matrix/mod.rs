//! Модуль для работы с матрицами
//!
//! Предоставляет:
//! - Типы матриц и параметры нагрузки
//! - CPU реализацию умножения и проверку результатов
//! - Загрузку исходного кода ядра

mod types;
pub mod operations;
pub mod kernels;

pub use types::{Dims, Fill, Matrix, Workload};
pub use operations::{cpu_matrix_multiply, compare_results, initialize_matrices};
pub use kernels::{load_kernel_source, KERNEL_ENTRY, KERNEL_PATH};
