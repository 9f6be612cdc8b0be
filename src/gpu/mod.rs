//! Вычисления на GPU: выбор устройства, сборка ядра, запуск

pub mod device;
pub mod dispatch;
pub mod program;

pub use device::{select_device, SelectedDevice};
pub use dispatch::gpu_matrix_multiply;
pub use program::GpuSetup;
