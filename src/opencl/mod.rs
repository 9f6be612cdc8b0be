//! Модуль для работы с OpenCL
//!
//! Содержит привязки, загружаемые во время выполнения, и RAII-обёртки над объектами OpenCL

pub mod bindings;
pub mod handles;
pub mod types;
pub mod utils;

pub use bindings::OpenCl;
pub use handles::Handle;
