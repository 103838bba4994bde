use crate::foundation::error::{DirscapeError, DirscapeResult};

/// Bounded 2D grid of non-negative finite values, row-major.
///
/// A matrix never changes after construction; `rows` and `cols` are both at least 1.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a validated matrix from row-major `data`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> DirscapeResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(DirscapeError::invalid_config(
                "matrix rows/cols must be >= 1",
            ));
        }
        if data.len() != rows * cols {
            return Err(DirscapeError::invalid_config(format!(
                "matrix data length {} does not match {rows}x{cols}",
                data.len()
            )));
        }
        if let Some(v) = data.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(DirscapeError::invalid_config(format!(
                "matrix values must be finite and non-negative (got {v})"
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Wrap data already known to satisfy the matrix invariant.
    pub(crate) fn from_trusted(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert!(rows >= 1 && cols >= 1 && data.len() == rows * cols);
        debug_assert!(data.iter().all(|v| v.is_finite() && *v >= 0.0));
        Self { rows, cols, data }
    }

    /// Build a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> DirscapeResult<Self> {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self::new(rows, cols, data)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at `(row, col)`; `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Row-major values.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Largest value in the matrix.
    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }
}

/// Axis limits shared by every frame of one animation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SceneBounds {
    /// Largest row count in the set.
    pub max_rows: usize,
    /// Largest column count in the set.
    pub max_cols: usize,
    /// Largest value in the set.
    pub max_value: f64,
}

/// Ordered matrices, index-aligned with the processed file records.
#[derive(Clone, Debug, Default)]
pub struct MatrixSet {
    matrices: Vec<Matrix>,
}

impl MatrixSet {
    /// Wrap an ordered list of matrices.
    pub fn new(matrices: Vec<Matrix>) -> Self {
        Self { matrices }
    }

    /// Number of matrices.
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// `true` when the set holds no matrices.
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Matrix at `idx`.
    pub fn get(&self, idx: usize) -> Option<&Matrix> {
        self.matrices.get(idx)
    }

    /// Iterate in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, Matrix> {
        self.matrices.iter()
    }

    /// Axis limits covering every matrix; `None` for an empty set.
    pub fn bounds(&self) -> Option<SceneBounds> {
        if self.matrices.is_empty() {
            return None;
        }
        let mut b = SceneBounds {
            max_rows: 0,
            max_cols: 0,
            max_value: 0.0,
        };
        for m in &self.matrices {
            b.max_rows = b.max_rows.max(m.rows());
            b.max_cols = b.max_cols.max(m.cols());
            b.max_value = b.max_value.max(m.max_value());
        }
        Some(b)
    }
}

impl From<Vec<Matrix>> for MatrixSet {
    fn from(matrices: Vec<Matrix>) -> Self {
        Self::new(matrices)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/matrix/model.rs"]
mod tests;
