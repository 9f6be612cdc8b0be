//! OpenCL типы данных и константы

use std::ffi::{c_char, c_void};

#[allow(non_camel_case_types)]
pub type cl_platform_id = *mut c_void;
#[allow(non_camel_case_types)]
pub type cl_device_id = *mut c_void;
#[allow(non_camel_case_types)]
pub type cl_context = *mut c_void;
#[allow(non_camel_case_types)]
pub type cl_command_queue = *mut c_void;
#[allow(non_camel_case_types)]
pub type cl_program = *mut c_void;
#[allow(non_camel_case_types)]
pub type cl_kernel = *mut c_void;
#[allow(non_camel_case_types)]
pub type cl_mem = *mut c_void;
#[allow(non_camel_case_types)]
pub type cl_event = *mut c_void;
#[allow(non_camel_case_types)]
pub type cl_platform_info = u32;
#[allow(non_camel_case_types)]
pub type cl_device_info = u32;
#[allow(non_camel_case_types)]
pub type cl_device_type = u64;
#[allow(non_camel_case_types)]
pub type cl_int = i32;
#[allow(non_camel_case_types)]
pub type cl_uint = u32;
#[allow(non_camel_case_types)]
pub type cl_bool = u32;
#[allow(non_camel_case_types)]
pub type cl_context_properties = isize;
#[allow(non_camel_case_types)]
pub type cl_command_queue_properties = u64;
#[allow(non_camel_case_types)]
pub type cl_mem_flags = u64;
#[allow(non_camel_case_types)]
pub type cl_program_build_info = u32;
#[allow(non_camel_case_types)]
pub type cl_build_status = i32;

/// Callback уведомлений контекста
pub type ContextNotifyCallback =
    Option<unsafe extern "C" fn(*const c_char, *const c_void, usize, *mut c_void)>;

/// Callback завершения сборки программы
pub type BuildNotifyCallback = Option<unsafe extern "C" fn(cl_program, *mut c_void)>;

pub const CL_SUCCESS: cl_int = 0;
pub const CL_DEVICE_NOT_FOUND: cl_int = -1;
pub const CL_BUILD_PROGRAM_FAILURE: cl_int = -11;
pub const CL_INVALID_VALUE: cl_int = -30;
pub const CL_INVALID_KERNEL_NAME: cl_int = -46;
pub const CL_INVALID_KERNEL_ARGS: cl_int = -52;
pub const CL_PLATFORM_NOT_FOUND_KHR: cl_int = -1001;

pub const CL_TRUE: cl_bool = 1;

pub const CL_PLATFORM_NAME: cl_platform_info = 0x0902;

pub const CL_DEVICE_TYPE_ALL: cl_device_type = 0xFFFF_FFFF;
pub const CL_DEVICE_NAME: cl_device_info = 0x102B;

pub const CL_QUEUE_PROFILING_ENABLE: cl_command_queue_properties = 1 << 1;

pub const CL_MEM_READ_WRITE: cl_mem_flags = 1 << 0;
pub const CL_MEM_READ_ONLY: cl_mem_flags = 1 << 2;
pub const CL_MEM_COPY_HOST_PTR: cl_mem_flags = 1 << 5;
pub const CL_MEM_HOST_READ_ONLY: cl_mem_flags = 1 << 8;
pub const CL_MEM_HOST_NO_ACCESS: cl_mem_flags = 1 << 9;

pub const CL_PROGRAM_BUILD_STATUS: cl_program_build_info = 0x1181;
pub const CL_PROGRAM_BUILD_LOG: cl_program_build_info = 0x1183;

pub const CL_BUILD_SUCCESS: cl_build_status = 0;

/// Символьное имя кода ошибки OpenCL, если он известен
pub fn error_name(code: cl_int) -> Option<&'static str> {
    let name = match code {
        CL_SUCCESS => "CL_SUCCESS",
        CL_DEVICE_NOT_FOUND => "CL_DEVICE_NOT_FOUND",
        -2 => "CL_DEVICE_NOT_AVAILABLE",
        -3 => "CL_COMPILER_NOT_AVAILABLE",
        -4 => "CL_MEM_OBJECT_ALLOCATION_FAILURE",
        -5 => "CL_OUT_OF_RESOURCES",
        -6 => "CL_OUT_OF_HOST_MEMORY",
        CL_BUILD_PROGRAM_FAILURE => "CL_BUILD_PROGRAM_FAILURE",
        CL_INVALID_VALUE => "CL_INVALID_VALUE",
        -33 => "CL_INVALID_DEVICE",
        -34 => "CL_INVALID_CONTEXT",
        -36 => "CL_INVALID_COMMAND_QUEUE",
        -38 => "CL_INVALID_MEM_OBJECT",
        -44 => "CL_INVALID_PROGRAM",
        -45 => "CL_INVALID_PROGRAM_EXECUTABLE",
        CL_INVALID_KERNEL_NAME => "CL_INVALID_KERNEL_NAME",
        -48 => "CL_INVALID_KERNEL",
        -49 => "CL_INVALID_ARG_INDEX",
        -50 => "CL_INVALID_ARG_VALUE",
        -51 => "CL_INVALID_ARG_SIZE",
        CL_INVALID_KERNEL_ARGS => "CL_INVALID_KERNEL_ARGS",
        -53 => "CL_INVALID_WORK_DIMENSION",
        -54 => "CL_INVALID_WORK_GROUP_SIZE",
        -63 => "CL_INVALID_GLOBAL_WORK_SIZE",
        CL_PLATFORM_NOT_FOUND_KHR => "CL_PLATFORM_NOT_FOUND_KHR",
        _ => return None,
    };
    Some(name)
}
