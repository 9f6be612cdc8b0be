//! Операции над матрицами

use super::types::{Dims, Matrix, Workload};
use crate::error::ShapeMismatch;
use rayon::prelude::*;

/// Создаёт входные матрицы A (M×K) и B (K×N) для заданной нагрузки
pub fn initialize_matrices(workload: &Workload) -> (Matrix, Matrix) {
    let Dims { m, n, k } = workload.dims;
    let a = Matrix::filled(m, k, workload.fill_a);
    let b = Matrix::filled(k, n, workload.fill_b);
    (a, b)
}

/// Параллельная CPU реализация: C[i][j] = Σ a[i*K + k] * b[j + k*N].
///
/// Строки C распределяются между потоками rayon; каждая ячейка считается
/// независимо. Арифметика 32-битная с переполнением по модулю 2^32, как на устройстве.
pub fn cpu_matrix_multiply(a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<(), ShapeMismatch> {
    let Dims { m, n, k } = Dims::of(a, b, c)?;
    if m == 0 || n == 0 {
        return Ok(());
    }

    let a = a.as_slice();
    let b = b.as_slice();
    c.as_slice_mut()
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(i, row)| {
            let a_row = &a[i * k..(i + 1) * k];
            for (j, cell) in row.iter_mut().enumerate() {
                let mut sum = 0i32;
                for (kk, &a_ik) in a_row.iter().enumerate() {
                    sum = sum.wrapping_add(a_ik.wrapping_mul(b[j + kk * n]));
                }
                *cell = sum;
            }
        });
    Ok(())
}

/// Поэлементно сравнивает результаты CPU и GPU без допуска
pub fn compare_results(cpu_result: &Matrix, gpu_result: &Matrix) -> bool {
    cpu_result.shape() == gpu_result.shape() && cpu_result.as_slice() == gpu_result.as_slice()
}
