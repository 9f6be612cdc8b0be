//! Низкоуровневые привязки к OpenCL API
//!
//! Функции загружаются из ICD-загрузчика во время выполнения, поэтому
//! программа собирается и запускается и на машинах без OpenCL.

use super::types::*;
use libloading::Library;
use std::ffi::{c_char, c_void};
use std::fmt;
use tracing::debug;

#[cfg(target_os = "windows")]
const LIBRARY_NAMES: &[&str] = &["OpenCL.dll"];
#[cfg(target_os = "macos")]
const LIBRARY_NAMES: &[&str] = &["/System/Library/Frameworks/OpenCL.framework/OpenCL"];
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const LIBRARY_NAMES: &[&str] = &["libOpenCL.so.1", "libOpenCL.so"];

/// Функция освобождения объекта OpenCL (`clRelease*`)
pub type ReleaseFn = unsafe extern "C" fn(*mut c_void) -> cl_int;

macro_rules! cl_api {
    ($( $field:ident = $symbol:literal : fn($($arg:ty),*) -> $ret:ty; )*) => {
        /// Таблица функций OpenCL, разрешённых из загруженной библиотеки
        pub struct OpenCl {
            $( pub $field: unsafe extern "C" fn($($arg),*) -> $ret, )*
            // Должна жить дольше любого указателя на функцию выше;
            // `None` только у таблицы-заглушки в тестах
            _library: Option<Library>,
        }

        impl OpenCl {
            fn resolve(library: Library) -> Result<Self, libloading::Error> {
                $(
                    let $field = unsafe {
                        *library.get::<unsafe extern "C" fn($($arg),*) -> $ret>($symbol)?
                    };
                )*
                Ok(Self { $( $field, )* _library: Some(library) })
            }
        }
    };
}

cl_api! {
    get_platform_ids = b"clGetPlatformIDs\0":
        fn(cl_uint, *mut cl_platform_id, *mut cl_uint) -> cl_int;
    get_platform_info = b"clGetPlatformInfo\0":
        fn(cl_platform_id, cl_platform_info, usize, *mut c_void, *mut usize) -> cl_int;
    get_device_ids = b"clGetDeviceIDs\0":
        fn(cl_platform_id, cl_device_type, cl_uint, *mut cl_device_id, *mut cl_uint) -> cl_int;
    get_device_info = b"clGetDeviceInfo\0":
        fn(cl_device_id, cl_device_info, usize, *mut c_void, *mut usize) -> cl_int;
    create_context = b"clCreateContext\0":
        fn(
            *const cl_context_properties,
            cl_uint,
            *const cl_device_id,
            ContextNotifyCallback,
            *mut c_void,
            *mut cl_int
        ) -> cl_context;
    create_command_queue = b"clCreateCommandQueue\0":
        fn(cl_context, cl_device_id, cl_command_queue_properties, *mut cl_int) -> cl_command_queue;
    create_program_with_source = b"clCreateProgramWithSource\0":
        fn(cl_context, cl_uint, *const *const c_char, *const usize, *mut cl_int) -> cl_program;
    build_program = b"clBuildProgram\0":
        fn(cl_program, cl_uint, *const cl_device_id, *const c_char, BuildNotifyCallback, *mut c_void) -> cl_int;
    get_program_build_info = b"clGetProgramBuildInfo\0":
        fn(cl_program, cl_device_id, cl_program_build_info, usize, *mut c_void, *mut usize) -> cl_int;
    create_kernel = b"clCreateKernel\0":
        fn(cl_program, *const c_char, *mut cl_int) -> cl_kernel;
    set_kernel_arg = b"clSetKernelArg\0":
        fn(cl_kernel, cl_uint, usize, *const c_void) -> cl_int;
    create_buffer = b"clCreateBuffer\0":
        fn(cl_context, cl_mem_flags, usize, *mut c_void, *mut cl_int) -> cl_mem;
    enqueue_nd_range_kernel = b"clEnqueueNDRangeKernel\0":
        fn(
            cl_command_queue,
            cl_kernel,
            cl_uint,
            *const usize,
            *const usize,
            *const usize,
            cl_uint,
            *const cl_event,
            *mut cl_event
        ) -> cl_int;
    enqueue_read_buffer = b"clEnqueueReadBuffer\0":
        fn(
            cl_command_queue,
            cl_mem,
            cl_bool,
            usize,
            usize,
            *mut c_void,
            cl_uint,
            *const cl_event,
            *mut cl_event
        ) -> cl_int;
    finish = b"clFinish\0":
        fn(cl_command_queue) -> cl_int;
    release_mem_object = b"clReleaseMemObject\0":
        fn(cl_mem) -> cl_int;
    release_kernel = b"clReleaseKernel\0":
        fn(cl_kernel) -> cl_int;
    release_command_queue = b"clReleaseCommandQueue\0":
        fn(cl_command_queue) -> cl_int;
    release_program = b"clReleaseProgram\0":
        fn(cl_program) -> cl_int;
    release_context = b"clReleaseContext\0":
        fn(cl_context) -> cl_int;
}

impl OpenCl {
    /// Загружает ICD-загрузчик OpenCL и разрешает все используемые функции
    pub fn load() -> Result<Self, libloading::Error> {
        let mut library = unsafe { Library::new(LIBRARY_NAMES[0]) };
        for name in &LIBRARY_NAMES[1..] {
            if library.is_ok() {
                break;
            }
            library = unsafe { Library::new(name) };
        }
        let api = Self::resolve(library?)?;
        debug!("OpenCL ICD loader resolved");
        Ok(api)
    }
}

impl fmt::Debug for OpenCl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenCl").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod fake;
