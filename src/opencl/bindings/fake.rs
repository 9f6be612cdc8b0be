//! Таблица-заглушка OpenCL для модульных тестов
//!
//! Все вызовы записываются в состояние текущего потока. Буферы хранятся в
//! памяти хоста, а запуск ядра выполняет то же умножение, что и `mult.cl`,
//! читая аргументы так, как их передал вызывающий код.

use super::OpenCl;
use crate::opencl::types::*;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ffi::{c_char, c_void, CStr};
use std::mem;
use std::ptr;

const PLATFORM: usize = 0x10;
const DEVICE: usize = 0x20;
const CONTEXT: usize = 0x100;
const PROGRAM: usize = 0x200;
const KERNEL: usize = 0x300;
const QUEUE: usize = 0x400;
const BUFFER_BASE: usize = 0x1000;

#[derive(Debug, Clone)]
pub(crate) struct FakeBuffer {
    pub flags: cl_mem_flags,
    pub data: Vec<u8>,
}

/// Настройки заглушки и журнал вызовов
#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub build_code: cl_int,
    pub build_status: cl_build_status,
    pub status_query_code: cl_int,
    pub build_log: String,

    pub buffers: Vec<FakeBuffer>,
    pub args: BTreeMap<cl_uint, Vec<u8>>,
    pub kernel_names: Vec<String>,
    pub queue_properties: Vec<cl_command_queue_properties>,
    pub launches: Vec<[usize; 2]>,
    pub blocking_reads: Vec<cl_bool>,
    pub finishes: usize,
    pub released: usize,
}

impl FakeState {
    /// Номер буфера, переданного аргументом `index`
    pub fn buffer_arg(&self, index: cl_uint) -> Option<usize> {
        let bytes: [u8; mem::size_of::<usize>()] = self.args.get(&index)?.as_slice().try_into().ok()?;
        let slot = usize::from_ne_bytes(bytes).checked_sub(BUFFER_BASE)?;
        (slot < self.buffers.len()).then_some(slot)
    }

    pub fn uint_arg(&self, index: cl_uint) -> Option<cl_uint> {
        let bytes: [u8; 4] = self.args.get(&index)?.as_slice().try_into().ok()?;
        Some(cl_uint::from_ne_bytes(bytes))
    }

    // c[row * N + col] = Σ a[row * K + k] * b[col + k * N], с переполнением по модулю 2^32
    fn run_kernel(&mut self, global: [usize; 2]) -> cl_int {
        let (Some(a), Some(b), Some(c)) = (self.buffer_arg(0), self.buffer_arg(1), self.buffer_arg(2)) else {
            return CL_INVALID_KERNEL_ARGS;
        };
        let (Some(m), Some(n), Some(k)) = (self.uint_arg(3), self.uint_arg(4), self.uint_arg(5)) else {
            return CL_INVALID_KERNEL_ARGS;
        };
        let (m, n, k) = (m as usize, n as usize, k as usize);

        let a_vals = ints(&self.buffers[a].data);
        let b_vals = ints(&self.buffers[b].data);
        let mut c_vals = ints(&self.buffers[c].data);
        if a_vals.len() < m * k || b_vals.len() < k * n || c_vals.len() < m * n {
            return CL_INVALID_KERNEL_ARGS;
        }

        for row in 0..global[1] {
            for col in 0..global[0] {
                if row >= m || col >= n {
                    continue;
                }
                let mut sum = 0u32;
                for kk in 0..k {
                    sum = sum.wrapping_add((a_vals[row * k + kk] as u32).wrapping_mul(b_vals[col + kk * n] as u32));
                }
                c_vals[row * n + col] = sum as i32;
            }
        }
        self.buffers[c].data = c_vals.iter().flat_map(|v| v.to_ne_bytes()).collect();
        CL_SUCCESS
    }
}

thread_local! {
    static STATE: RefCell<FakeState> = RefCell::new(FakeState::default());
}

/// Заменяет состояние заглушки в текущем потоке
pub(crate) fn install(state: FakeState) {
    STATE.with(|cell| *cell.borrow_mut() = state);
}

pub(crate) fn with_state<R>(f: impl FnOnce(&mut FakeState) -> R) -> R {
    STATE.with(|cell| f(&mut cell.borrow_mut()))
}

/// Таблица функций, целиком отвечающая заглушками
pub(crate) fn fake_api() -> OpenCl {
    OpenCl {
        get_platform_ids,
        get_platform_info,
        get_device_ids,
        get_device_info,
        create_context,
        create_command_queue,
        create_program_with_source,
        build_program,
        get_program_build_info,
        create_kernel,
        set_kernel_arg,
        create_buffer,
        enqueue_nd_range_kernel,
        enqueue_read_buffer,
        finish,
        release_mem_object: release,
        release_kernel: release,
        release_command_queue: release,
        release_program: release,
        release_context: release,
        _library: None,
    }
}

fn ints(bytes: &[u8]) -> Vec<i32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| i32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

fn handle(tag: usize) -> *mut c_void {
    tag as *mut c_void
}

unsafe fn set_err(errcode_ret: *mut cl_int, code: cl_int) {
    if !errcode_ret.is_null() {
        *errcode_ret = code;
    }
}

unsafe fn write_info(bytes: &[u8], size: usize, value: *mut c_void, size_ret: *mut usize) -> cl_int {
    if !size_ret.is_null() {
        *size_ret = bytes.len();
    }
    if !value.is_null() {
        if size < bytes.len() {
            return CL_INVALID_VALUE;
        }
        ptr::copy_nonoverlapping(bytes.as_ptr(), value.cast::<u8>(), bytes.len());
    }
    CL_SUCCESS
}

unsafe fn write_single(tag: usize, num: cl_uint, out: *mut *mut c_void, count: *mut cl_uint) -> cl_int {
    if !count.is_null() {
        *count = 1;
    }
    if !out.is_null() && num >= 1 {
        *out = handle(tag);
    }
    CL_SUCCESS
}

unsafe extern "C" fn get_platform_ids(num: cl_uint, platforms: *mut cl_platform_id, count: *mut cl_uint) -> cl_int {
    write_single(PLATFORM, num, platforms, count)
}

unsafe extern "C" fn get_platform_info(
    _platform: cl_platform_id,
    _param: cl_platform_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    write_info(b"Fake Platform\0", size, value, size_ret)
}

unsafe extern "C" fn get_device_ids(
    _platform: cl_platform_id,
    _device_type: cl_device_type,
    num: cl_uint,
    devices: *mut cl_device_id,
    count: *mut cl_uint,
) -> cl_int {
    write_single(DEVICE, num, devices, count)
}

unsafe extern "C" fn get_device_info(
    _device: cl_device_id,
    _param: cl_device_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    write_info(b"Fake Device\0", size, value, size_ret)
}

unsafe extern "C" fn create_context(
    _properties: *const cl_context_properties,
    _num_devices: cl_uint,
    _devices: *const cl_device_id,
    _notify: ContextNotifyCallback,
    _user_data: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_context {
    set_err(errcode_ret, CL_SUCCESS);
    handle(CONTEXT)
}

unsafe extern "C" fn create_command_queue(
    _context: cl_context,
    _device: cl_device_id,
    properties: cl_command_queue_properties,
    errcode_ret: *mut cl_int,
) -> cl_command_queue {
    with_state(|state| state.queue_properties.push(properties));
    set_err(errcode_ret, CL_SUCCESS);
    handle(QUEUE)
}

unsafe extern "C" fn create_program_with_source(
    _context: cl_context,
    _count: cl_uint,
    _strings: *const *const c_char,
    _lengths: *const usize,
    errcode_ret: *mut cl_int,
) -> cl_program {
    set_err(errcode_ret, CL_SUCCESS);
    handle(PROGRAM)
}

unsafe extern "C" fn build_program(
    _program: cl_program,
    _num_devices: cl_uint,
    _devices: *const cl_device_id,
    _options: *const c_char,
    _notify: BuildNotifyCallback,
    _user_data: *mut c_void,
) -> cl_int {
    with_state(|state| state.build_code)
}

unsafe extern "C" fn get_program_build_info(
    _program: cl_program,
    _device: cl_device_id,
    param: cl_program_build_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    let (query_code, status, log) =
        with_state(|state| (state.status_query_code, state.build_status, format!("{}\0", state.build_log)));
    match param {
        CL_PROGRAM_BUILD_STATUS if query_code != CL_SUCCESS => query_code,
        CL_PROGRAM_BUILD_STATUS => write_info(&status.to_ne_bytes(), size, value, size_ret),
        CL_PROGRAM_BUILD_LOG => write_info(log.as_bytes(), size, value, size_ret),
        _ => CL_INVALID_VALUE,
    }
}

unsafe extern "C" fn create_kernel(_program: cl_program, name: *const c_char, errcode_ret: *mut cl_int) -> cl_kernel {
    let name = CStr::from_ptr(name).to_string_lossy().into_owned();
    with_state(|state| state.kernel_names.push(name));
    set_err(errcode_ret, CL_SUCCESS);
    handle(KERNEL)
}

unsafe extern "C" fn set_kernel_arg(_kernel: cl_kernel, index: cl_uint, size: usize, value: *const c_void) -> cl_int {
    if value.is_null() {
        return CL_INVALID_VALUE;
    }
    let bytes = std::slice::from_raw_parts(value.cast::<u8>(), size).to_vec();
    with_state(|state| state.args.insert(index, bytes));
    CL_SUCCESS
}

unsafe extern "C" fn create_buffer(
    _context: cl_context,
    flags: cl_mem_flags,
    size: usize,
    host_ptr: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_mem {
    if size == 0 || (flags & CL_MEM_COPY_HOST_PTR != 0 && host_ptr.is_null()) {
        set_err(errcode_ret, CL_INVALID_VALUE);
        return ptr::null_mut();
    }
    let data = if flags & CL_MEM_COPY_HOST_PTR != 0 {
        std::slice::from_raw_parts(host_ptr.cast::<u8>(), size).to_vec()
    } else {
        vec![0; size]
    };
    let slot = with_state(|state| {
        state.buffers.push(FakeBuffer { flags, data });
        state.buffers.len() - 1
    });
    set_err(errcode_ret, CL_SUCCESS);
    handle(BUFFER_BASE + slot)
}

unsafe extern "C" fn enqueue_nd_range_kernel(
    _queue: cl_command_queue,
    _kernel: cl_kernel,
    work_dim: cl_uint,
    _offset: *const usize,
    global: *const usize,
    _local: *const usize,
    _num_events: cl_uint,
    _wait_list: *const cl_event,
    _event: *mut cl_event,
) -> cl_int {
    if work_dim != 2 || global.is_null() {
        return CL_INVALID_VALUE;
    }
    let global = [*global, *global.add(1)];
    with_state(|state| {
        state.launches.push(global);
        state.run_kernel(global)
    })
}

unsafe extern "C" fn enqueue_read_buffer(
    _queue: cl_command_queue,
    buffer: cl_mem,
    blocking: cl_bool,
    offset: usize,
    size: usize,
    out: *mut c_void,
    _num_events: cl_uint,
    _wait_list: *const cl_event,
    _event: *mut cl_event,
) -> cl_int {
    let data = with_state(|state| {
        state.blocking_reads.push(blocking);
        let slot = (buffer as usize).checked_sub(BUFFER_BASE)?;
        let data = &state.buffers.get(slot)?.data;
        data.get(offset..offset.checked_add(size)?).map(<[u8]>::to_vec)
    });
    match data {
        Some(bytes) if !out.is_null() => {
            ptr::copy_nonoverlapping(bytes.as_ptr(), out.cast::<u8>(), bytes.len());
            CL_SUCCESS
        }
        _ => CL_INVALID_VALUE,
    }
}

unsafe extern "C" fn finish(_queue: cl_command_queue) -> cl_int {
    with_state(|state| state.finishes += 1);
    CL_SUCCESS
}

unsafe extern "C" fn release(_object: *mut c_void) -> cl_int {
    with_state(|state| state.released += 1);
    CL_SUCCESS
}
