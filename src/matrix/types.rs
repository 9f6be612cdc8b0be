//! Типы матриц и связанные структуры

use crate::error::ShapeMismatch;
use ndarray::{Array2, ShapeError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Способ заполнения входной матрицы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Все элементы равны константе
    Constant(i32),
    /// Детерминированные псевдослучайные значения из [-100, 100]
    Random { seed: u64 },
}

/// Размеры задачи: A — M×K, B — K×N, C — M×N
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    pub m: usize,
    pub n: usize,
    pub k: usize,
}

impl Dims {
    pub const fn new(m: usize, n: usize, k: usize) -> Self {
        Self { m, n, k }
    }

    /// Проверяет согласованность A, B и C и возвращает общие размеры
    pub fn of(a: &Matrix, b: &Matrix, c: &Matrix) -> Result<Self, ShapeMismatch> {
        let dims = Self::new(a.rows(), b.cols(), a.cols());
        if b.rows() != dims.k || c.shape() != (dims.m, dims.n) {
            return Err(ShapeMismatch {
                a: a.shape(),
                b: b.shape(),
                c: c.shape(),
            });
        }
        Ok(dims)
    }
}

/// Параметры бенчмарка
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    pub dims: Dims,
    pub fill_a: Fill,
    pub fill_b: Fill,
    /// Количество повторов в каждой серии замеров
    pub repeats: usize,
}

impl Workload {
    /// Фиксированная нагрузка бенчмарка
    pub const BENCHMARK: Workload = Workload {
        dims: Dims::new(256, 256, 4096),
        fill_a: Fill::Constant(2),
        fill_b: Fill::Constant(4),
        repeats: 5,
    };
}

/// Плотная матрица `i32` в построчном (row-major) порядке
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    data: Array2<i32>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Создаёт нулевую матрицу и заполняет её согласно `fill`
    pub fn filled(rows: usize, cols: usize, fill: Fill) -> Self {
        let mut matrix = Self::zeros(rows, cols);
        match fill {
            Fill::Constant(value) => matrix.data.fill(value),
            Fill::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                matrix.data.mapv_inplace(|_| rng.gen_range(-100..=100));
            }
        }
        matrix
    }

    pub fn from_vec(rows: usize, cols: usize, values: Vec<i32>) -> Result<Self, ShapeError> {
        Ok(Self {
            data: Array2::from_shape_vec((rows, cols), values)?,
        })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        self.data.get((row, col)).copied()
    }

    // Все конструкторы создают массив в стандартном (row-major) расположении,
    // поэтому срез всегда доступен.
    pub fn as_slice(&self) -> &[i32] {
        self.data.as_slice().unwrap_or_default()
    }

    pub fn as_slice_mut(&mut self) -> &mut [i32] {
        self.data.as_slice_mut().unwrap_or_default()
    }
}
