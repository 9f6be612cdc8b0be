//! Поиск платформы и выбор устройства OpenCL

use crate::error::{ClError, Result, SetupError};
use crate::opencl::types::*;
use crate::opencl::utils::{check, query_string};
use crate::opencl::OpenCl;
use std::ptr;
use tracing::{debug, info};

/// Выбранное устройство и его платформа
#[derive(Debug, Clone)]
pub struct SelectedDevice {
    pub platform: cl_platform_id,
    pub device: cl_device_id,
    pub name: String,
}

/// Выбирает первую платформу и первое устройство на ней.
///
/// Имя каждого устройства-кандидата печатается в stdout.
pub fn select_device(api: &OpenCl) -> Result<SelectedDevice> {
    let platforms = platform_ids(api)?;
    debug!(count = platforms.len(), "OpenCL platforms found");

    let mut names = Vec::new();
    let (platform, device) = choose_first(
        &platforms,
        |platform| {
            let name = platform_name(api, platform)?;
            info!(platform = %name, "using OpenCL platform");
            Ok(device_ids(api, platform)?)
        },
        |index, device| {
            let name = device_name(api, device)?;
            println!("device {index}: {name}");
            names.push(name);
            Ok(())
        },
    )?;

    Ok(SelectedDevice {
        platform,
        device,
        name: names.into_iter().next().unwrap_or_default(),
    })
}

/// Политика выбора: первая платформа, все её устройства передаются в `on_candidate`,
/// выбирается первое.
///
/// Пустой список платформ даёт [`SetupError::NoPlatforms`] без обращения к устройствам.
pub fn choose_first<P, D, F, G>(platforms: &[P], devices_of: F, mut on_candidate: G) -> Result<(P, D)>
where
    P: Copy,
    D: Copy,
    F: FnOnce(P) -> Result<Vec<D>>,
    G: FnMut(usize, D) -> Result<()>,
{
    let platform = *platforms.first().ok_or(SetupError::NoPlatforms)?;
    let devices = devices_of(platform)?;
    for (index, &device) in devices.iter().enumerate() {
        on_candidate(index, device)?;
    }
    let device = *devices.first().ok_or(SetupError::NoDevices)?;
    Ok((platform, device))
}

fn platform_ids(api: &OpenCl) -> Result<Vec<cl_platform_id>, ClError> {
    let mut count: cl_uint = 0;
    let code = unsafe { (api.get_platform_ids)(0, ptr::null_mut(), &mut count) };
    if code == CL_PLATFORM_NOT_FOUND_KHR || (code == CL_SUCCESS && count == 0) {
        return Ok(Vec::new());
    }
    check("clGetPlatformIDs", code)?;

    let mut platforms = vec![ptr::null_mut(); count as usize];
    cl_check!(
        "clGetPlatformIDs",
        (api.get_platform_ids)(count, platforms.as_mut_ptr(), ptr::null_mut())
    )?;
    Ok(platforms)
}

fn device_ids(api: &OpenCl, platform: cl_platform_id) -> Result<Vec<cl_device_id>, ClError> {
    let mut count: cl_uint = 0;
    let code = unsafe {
        (api.get_device_ids)(platform, CL_DEVICE_TYPE_ALL, 0, ptr::null_mut(), &mut count)
    };
    if code == CL_DEVICE_NOT_FOUND || (code == CL_SUCCESS && count == 0) {
        return Ok(Vec::new());
    }
    check("clGetDeviceIDs", code)?;

    let mut devices = vec![ptr::null_mut(); count as usize];
    cl_check!(
        "clGetDeviceIDs",
        (api.get_device_ids)(
            platform,
            CL_DEVICE_TYPE_ALL,
            count,
            devices.as_mut_ptr(),
            ptr::null_mut()
        )
    )?;
    Ok(devices)
}

fn platform_name(api: &OpenCl, platform: cl_platform_id) -> Result<String, ClError> {
    query_string("clGetPlatformInfo", |size, value, size_ret| unsafe {
        (api.get_platform_info)(platform, CL_PLATFORM_NAME, size, value, size_ret)
    })
}

fn device_name(api: &OpenCl, device: cl_device_id) -> Result<String, ClError> {
    query_string("clGetDeviceInfo", |size, value, size_ret| unsafe {
        (api.get_device_info)(device, CL_DEVICE_NAME, size, value, size_ret)
    })
}
