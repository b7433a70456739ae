//! Dense 2D scalar field
//!
//! A `Grid` is either the simulated field (surface height / temperature) or a
//! small convolution kernel. Shape is fixed at construction; indexing outside
//! the shape is a programming error and panics.

use std::fmt;
use std::ops::Mul;

use ndarray::{Array2, s};

/// Row-major 2D array of `f32`
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Array2<f32>,
}

impl Grid {
    /// Zero-filled grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: Array2::zeros((rows, cols)),
        }
    }

    /// Grid from row-major values
    ///
    /// Panics if `values.len() != rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, values: &[f32]) -> Self {
        assert_eq!(
            values.len(),
            rows * cols,
            "{} values cannot fill a {}x{} grid",
            values.len(),
            rows,
            cols
        );
        let cells = Array2::from_shape_vec((rows, cols), values.to_vec())
            .expect("length checked above");
        Self { cells }
    }

    /// 3x3 cross-shaped discrete Laplacian
    pub fn laplacian_stencil() -> Self {
        #[rustfmt::skip]
        let window = [
            0.0,  1.0, 0.0,
            1.0, -4.0, 1.0,
            0.0,  1.0, 0.0,
        ];
        Self::from_row_major(3, 3, &window)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True for cells on the outermost row or column
    #[inline]
    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 == self.rows() || col + 1 == self.cols()
    }

    #[track_caller]
    fn check_bounds(&self, row: usize, col: usize) {
        assert!(
            row < self.rows() && col < self.cols(),
            "grid index ({row}, {col}) out of bounds for {}x{} grid",
            self.rows(),
            self.cols()
        );
    }

    #[track_caller]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.check_bounds(row, col);
        self.cells[[row, col]]
    }

    #[track_caller]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.check_bounds(row, col);
        self.cells[[row, col]] = value;
    }

    /// Add `amount` to a single cell
    #[track_caller]
    pub fn add(&mut self, row: usize, col: usize, amount: f32) {
        self.check_bounds(row, col);
        self.cells[[row, col]] += amount;
    }

    /// Set every cell to zero
    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    /// Smallest and largest cell value
    ///
    /// Panics on an empty grid.
    pub fn value_interval(&self) -> (f32, f32) {
        assert!(!self.is_empty(), "value interval of an empty grid");
        let first = self.cells[[0, 0]];
        self.cells
            .iter()
            .fold((first, first), |(min, max), &v| (min.min(v), max.max(v)))
    }

    /// Valid-mode 2D convolution (no padding, kernel not flipped)
    ///
    /// Output shape is `(rows - k_rows + 1, cols - k_cols + 1)`.
    pub fn convolve(&self, kernel: &Grid) -> Grid {
        assert!(
            kernel.rows() <= self.rows() && kernel.cols() <= self.cols(),
            "{}x{} kernel larger than {}x{} grid",
            kernel.rows(),
            kernel.cols(),
            self.rows(),
            self.cols()
        );
        let out_rows = self.rows() - kernel.rows() + 1;
        let out_cols = self.cols() - kernel.cols() + 1;

        let mut out = Grid::new(out_rows, out_cols);
        for ((i, j), value) in out.cells.indexed_iter_mut() {
            let window = self
                .cells
                .slice(s![i..i + kernel.rows(), j..j + kernel.cols()]);
            *value = (&window * &kernel.cells).sum();
        }
        out
    }

    /// Row-major copy of all values
    pub fn to_vec(&self) -> Vec<f32> {
        self.cells.iter().copied().collect()
    }

    /// Replace all values from a row-major slice of the same length
    pub fn update_from_slice(&mut self, values: &[f32]) {
        assert_eq!(
            values.len(),
            self.len(),
            "{} values cannot refill a {}x{} grid",
            values.len(),
            self.rows(),
            self.cols()
        );
        for (cell, &v) in self.cells.iter_mut().zip(values) {
            *cell = v;
        }
    }
}

impl Mul<f32> for &Grid {
    type Output = Grid;

    fn mul(self, scalar: f32) -> Grid {
        Grid {
            cells: &self.cells * scalar,
        }
    }
}

impl Mul<f32> for Grid {
    type Output = Grid;

    fn mul(mut self, scalar: f32) -> Grid {
        self.cells *= scalar;
        self
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for value in row {
                write!(f, "{value}\t")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
