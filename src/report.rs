//! Итоговый отчёт бенчмарка

use crate::utils::Timing;
use prettytable::{row, Table};
use std::fmt;

/// Относительный выигрыш GPU: (cpu − gpu) / gpu.
///
/// Возвращает `None`, если время GPU не положительно или не конечно.
pub fn performance_gain(cpu_secs: f64, gpu_secs: f64) -> Option<f64> {
    if !(gpu_secs > 0.0 && gpu_secs.is_finite() && cpu_secs.is_finite()) {
        return None;
    }
    Some((cpu_secs - gpu_secs) / gpu_secs)
}

/// Отчёт: статус проверки, образцы значений и среднее время запуска
#[derive(Debug)]
pub struct Report<'a> {
    pub equal: bool,
    pub a_sample: i32,
    pub b_sample: i32,
    pub c_sample: i32,
    pub cpu: &'a Timing,
    pub gpu: &'a Timing,
}

impl Report<'_> {
    pub fn gain(&self) -> Option<f64> {
        performance_gain(self.cpu.mean_secs(), self.gpu.mean_secs())
    }

    /// Таблица времени каждого запуска
    pub fn runs_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["Run", "CPU, sec", "GPU, sec"]);
        let rows = self.cpu.runs().len().max(self.gpu.runs().len());
        for i in 0..rows {
            let run = i + 1;
            let cpu = seconds_cell(self.cpu, i);
            let gpu = seconds_cell(self.gpu, i);
            table.add_row(row![run, cpu, gpu]);
        }
        table
    }
}

fn seconds_cell(timing: &Timing, index: usize) -> String {
    timing
        .runs()
        .get(index)
        .map(|d| format!("{:.6}", d.as_secs_f64()))
        .unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status: {}", if self.equal { "SUCCESS" } else { "FAILURE" })?;
        writeln!(
            f,
            "Results: \n\tA[0] = {}\n\tB[0] = {}\n\tC[0] = {}",
            self.a_sample, self.b_sample, self.c_sample
        )?;
        writeln!(
            f,
            "Mean execution time: \n\tCPU: {:.6} sec;\n\tGPU: {:.6} sec.",
            self.cpu.mean_secs(),
            self.gpu.mean_secs()
        )?;
        match self.gain() {
            Some(gain) => write!(f, "Performance gain: {gain:.2}x"),
            None => write!(f, "Performance gain: n/a"),
        }
    }
}
