//! Контекст и сборка программы OpenCL

use super::device::{select_device, SelectedDevice};
use crate::error::{Result, SetupError};
use crate::matrix::load_kernel_source;
use crate::opencl::types::*;
use crate::opencl::utils::query_string;
use crate::opencl::{Handle, OpenCl};
use std::ffi::{c_char, c_void};
use std::mem;
use std::path::Path;
use std::ptr;
use tracing::{debug, error, info, warn};

/// Результат этапа подготовки: устройство, контекст и собранная программа.
///
/// Создаётся один раз и передаётся в каждый запуск ядра.
pub struct GpuSetup {
    // Порядок полей важен: объекты OpenCL освобождаются до выгрузки библиотеки
    program: Handle,
    context: Handle,
    device: cl_device_id,
    device_name: String,
    api: OpenCl,
}

impl GpuSetup {
    /// Загружает OpenCL, выбирает устройство и собирает ядро из файла `kernel_path`
    pub fn initialize(kernel_path: &Path) -> Result<Self> {
        let api = OpenCl::load()?;
        let selected = select_device(&api)?;
        let source = load_kernel_source(kernel_path)?;
        Self::build(api, selected, &source)
    }

    /// Создаёт контекст на выбранном устройстве и компилирует `source` ровно один раз
    pub fn build(api: OpenCl, selected: SelectedDevice, source: &str) -> Result<Self> {
        let device = selected.device;

        let context = cl_create!("clCreateContext", |err| (api.create_context)(
            ptr::null(),
            1,
            &device,
            None,
            ptr::null_mut(),
            &mut err
        ))?;
        let context = Handle::new(context, api.release_context);

        let source_ptr = source.as_ptr() as *const c_char;
        let source_len = source.len();
        let create_program = api.create_program_with_source;
        let program = cl_create!("clCreateProgramWithSource", |err| create_program(
            context.raw(),
            1,
            &source_ptr,
            &source_len,
            &mut err
        ))?;
        let program = Handle::new(program, api.release_program);

        let build_code = unsafe {
            (api.build_program)(program.raw(), 1, &device, ptr::null(), None, ptr::null_mut())
        };

        let mut status: cl_build_status = CL_BUILD_SUCCESS;
        let status_query = cl_check!(
            "clGetProgramBuildInfo",
            (api.get_program_build_info)(
                program.raw(),
                device,
                CL_PROGRAM_BUILD_STATUS,
                mem::size_of::<cl_build_status>(),
                &mut status as *mut cl_build_status as *mut c_void,
                ptr::null_mut()
            )
        );
        // После неудачной сборки статус берётся из кода clBuildProgram, а журнал всё равно запрашивается
        let status = match status_query {
            Ok(()) => status,
            Err(err) if build_code != CL_SUCCESS => {
                warn!(%err, "build status unavailable");
                build_code
            }
            Err(err) => return Err(err.into()),
        };

        if build_code != CL_SUCCESS || status != CL_BUILD_SUCCESS {
            let log = query_string("clGetProgramBuildInfo", |size, value, size_ret| unsafe {
                (api.get_program_build_info)(program.raw(), device, CL_PROGRAM_BUILD_LOG, size, value, size_ret)
            })
            .unwrap_or_else(|err| format!("<build log unavailable: {err}>"));
            error!(build_code, status, "kernel build failed");
            return Err(SetupError::Build { status, log });
        }

        info!(device = %selected.name, "kernel program built");
        debug!(bytes = source_len, "program source compiled");

        Ok(Self {
            program,
            context,
            device,
            device_name: selected.name,
            api,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub(crate) fn api(&self) -> &OpenCl {
        &self.api
    }

    pub(crate) fn device(&self) -> cl_device_id {
        self.device
    }

    pub(crate) fn context(&self) -> cl_context {
        self.context.raw()
    }

    pub(crate) fn program(&self) -> cl_program {
        self.program.raw()
    }
}

impl std::fmt::Debug for GpuSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuSetup")
            .field("device_name", &self.device_name)
            .finish_non_exhaustive()
    }
}
