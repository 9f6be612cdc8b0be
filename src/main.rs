//! Сравнение производительности умножения целочисленных матриц на CPU и GPU

use anyhow::{Context, Result};
use opencl_matmul::{
    gpu::{gpu_matrix_multiply, GpuSetup},
    matrix::{compare_results, cpu_matrix_multiply, initialize_matrices, Matrix, Workload, KERNEL_PATH},
    report::Report,
    utils::time_batch,
    SetupError,
};
use std::path::Path;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let workload = Workload::BENCHMARK;
    let dims = workload.dims;
    info!(m = dims.m, n = dims.n, k = dims.k, repeats = workload.repeats, "benchmark workload");

    // Входные матрицы A и B, отдельные результаты для CPU и GPU
    let (a, b) = initialize_matrices(&workload);
    let mut cpu_c = Matrix::zeros(dims.m, dims.n);
    let mut gpu_c = Matrix::zeros(dims.m, dims.n);

    let cpu_timing = time_batch("cpu", workload.repeats, || {
        cpu_matrix_multiply(&a, &b, &mut cpu_c)
    })
    .context("CPU multiplication failed")?;

    let setup = match GpuSetup::initialize(Path::new(KERNEL_PATH)) {
        Ok(setup) => setup,
        Err(err) => {
            report_setup_error(&err);
            process::exit(1);
        }
    };
    info!(device = setup.device_name(), "GPU setup complete");

    let gpu_timing = time_batch("gpu", workload.repeats, || {
        gpu_matrix_multiply(&setup, &a, &b, &mut gpu_c)
    })
    .context("GPU multiplication failed")?;

    let report = Report {
        equal: compare_results(&cpu_c, &gpu_c),
        a_sample: a.get(0, 0).unwrap_or_default(),
        b_sample: b.get(0, 0).unwrap_or_default(),
        c_sample: gpu_c.get(0, 0).unwrap_or_default(),
        cpu: &cpu_timing,
        gpu: &gpu_timing,
    };
    println!("{report}");
    report.runs_table().printstd();

    Ok(())
}

fn report_setup_error(err: &SetupError) {
    match err {
        SetupError::Build { status, log } => {
            eprintln!("Error!\nBuild Status: {status}\nInformation: {log}");
        }
        other => eprintln!("{other}"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
