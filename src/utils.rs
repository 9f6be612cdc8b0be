//! Вспомогательные функции и утилиты

use std::time::{Duration, Instant};
use tracing::debug;

/// Измеряет время выполнения функции
pub fn measure_time<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let duration = start.elapsed();
    (result, duration)
}

/// Замеры серии повторных запусков
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timing {
    runs: Vec<Duration>,
}

impl Timing {
    pub fn from_runs(runs: Vec<Duration>) -> Self {
        Self { runs }
    }

    pub fn runs(&self) -> &[Duration] {
        &self.runs
    }

    /// Суммарное время всей серии
    pub fn total(&self) -> Duration {
        self.runs.iter().sum()
    }

    /// Среднее время одного запуска в секундах; 0 для пустой серии
    pub fn mean_secs(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        self.total().as_secs_f64() / self.runs.len() as f64
    }
}

/// Выполняет `f` `repeats` раз подряд и замеряет каждый запуск.
///
/// Первая ошибка прерывает серию. Результат вычислений остаётся в буфере,
/// который заполняет `f`; сюда попадает только время.
pub fn time_batch<F, E>(label: &str, repeats: usize, mut f: F) -> Result<Timing, E>
where
    F: FnMut() -> Result<(), E>,
{
    let mut runs = Vec::with_capacity(repeats);
    for iteration in 0..repeats {
        let (result, elapsed) = measure_time(&mut f);
        result?;
        debug!(label, iteration, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "run finished");
        runs.push(elapsed);
    }
    Ok(Timing::from_runs(runs))
}
