//! Запуск ядра умножения матриц на устройстве

use super::program::GpuSetup;
use crate::error::DispatchError;
use crate::matrix::{Dims, Matrix, KERNEL_ENTRY};
use crate::opencl::types::*;
use crate::opencl::{Handle, OpenCl};
use std::ffi::c_void;
use std::mem;
use std::ptr;
use tracing::debug;

/// Умножает A на B на устройстве и записывает результат в `c`.
///
/// Каждый вызов заново создаёт буферы, ядро и очередь команд; программа и контекст
/// берутся из `setup`. Пространство индексов — (N, M): столбцы, затем строки.
pub fn gpu_matrix_multiply(
    setup: &GpuSetup,
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
) -> Result<(), DispatchError> {
    let dims = Dims::of(a, b, c)?;
    if dims.m == 0 || dims.n == 0 {
        return Ok(());
    }
    if dims.k == 0 {
        c.as_slice_mut().fill(0);
        return Ok(());
    }
    let m_arg = kernel_dim("M", dims.m)?;
    let n_arg = kernel_dim("N", dims.n)?;
    let k_arg = kernel_dim("K", dims.k)?;

    let api = setup.api();
    let context = setup.context();

    let a_buffer = input_buffer(api, context, a.as_slice())?;
    let b_buffer = input_buffer(api, context, b.as_slice())?;
    let c_bytes = mem::size_of_val(c.as_slice());
    let c_buffer = cl_create!("clCreateBuffer", |err| (api.create_buffer)(
        context,
        CL_MEM_READ_WRITE | CL_MEM_HOST_READ_ONLY,
        c_bytes,
        ptr::null_mut(),
        &mut err
    ))?;
    let c_buffer = Handle::new(c_buffer, api.release_mem_object);
    debug!(m = dims.m, n = dims.n, k = dims.k, c_bytes, "device buffers allocated");

    let kernel = cl_create!("clCreateKernel", |err| (api.create_kernel)(
        setup.program(),
        KERNEL_ENTRY.as_ptr(),
        &mut err
    ))?;
    let kernel = Handle::new(kernel, api.release_kernel);

    set_arg(api, &kernel, 0, &a_buffer.raw())?;
    set_arg(api, &kernel, 1, &b_buffer.raw())?;
    set_arg(api, &kernel, 2, &c_buffer.raw())?;
    set_arg(api, &kernel, 3, &m_arg)?;
    set_arg(api, &kernel, 4, &n_arg)?;
    set_arg(api, &kernel, 5, &k_arg)?;

    // Профилирование включено, но события не читаются
    let queue = cl_create!("clCreateCommandQueue", |err| (api.create_command_queue)(
        context,
        setup.device(),
        CL_QUEUE_PROFILING_ENABLE,
        &mut err
    ))?;
    let queue = Handle::new(queue, api.release_command_queue);

    let global_size = [dims.n, dims.m];
    cl_check!(
        "clEnqueueNDRangeKernel",
        (api.enqueue_nd_range_kernel)(
            queue.raw(),
            kernel.raw(),
            2,
            ptr::null(),
            global_size.as_ptr(),
            ptr::null(),
            0,
            ptr::null(),
            ptr::null_mut()
        )
    )?;
    cl_check!("clFinish", (api.finish)(queue.raw()))?;

    let out = c.as_slice_mut();
    cl_check!(
        "clEnqueueReadBuffer",
        (api.enqueue_read_buffer)(
            queue.raw(),
            c_buffer.raw(),
            CL_TRUE,
            0,
            c_bytes,
            out.as_mut_ptr().cast::<c_void>(),
            0,
            ptr::null(),
            ptr::null_mut()
        )
    )?;
    cl_check!("clFinish", (api.finish)(queue.raw()))?;

    Ok(())
}

/// Размерность передаётся в ядро как `unsigned int`
fn kernel_dim(name: &'static str, value: usize) -> Result<cl_uint, DispatchError> {
    cl_uint::try_from(value).map_err(|_| DispatchError::DimensionOverflow { name, value })
}

/// Буфер только для чтения устройством, заполненный копией данных хоста
fn input_buffer(api: &OpenCl, context: cl_context, data: &[i32]) -> Result<Handle, DispatchError> {
    let buffer = cl_create!("clCreateBuffer", |err| (api.create_buffer)(
        context,
        CL_MEM_READ_ONLY | CL_MEM_HOST_NO_ACCESS | CL_MEM_COPY_HOST_PTR,
        mem::size_of_val(data),
        data.as_ptr().cast_mut().cast::<c_void>(),
        &mut err
    ))?;
    Ok(Handle::new(buffer, api.release_mem_object))
}

fn set_arg<T>(api: &OpenCl, kernel: &Handle, index: cl_uint, value: &T) -> Result<(), DispatchError> {
    cl_check!(
        "clSetKernelArg",
        (api.set_kernel_arg)(
            kernel.raw(),
            index,
            mem::size_of::<T>(),
            value as *const T as *const c_void
        )
    )?;
    Ok(())
}
