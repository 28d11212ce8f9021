//! Core traits for the CDN solver

use crate::core::Result;

/// Read-only, column-major access to a sparse design matrix.
///
/// Rows are instances and columns are features. The solver visits every
/// active column once per epoch, so `column` must be cheap and the returned
/// view must be re-iterable without mutating the matrix.
pub trait SparseMatrixView: Send + Sync {
    /// Number of instances (rows)
    fn n_rows(&self) -> usize;

    /// Number of features (columns)
    fn n_cols(&self) -> usize;

    /// Nonzero entries of feature `j` in increasing row order
    ///
    /// Fails with `InvalidDimension` if `j >= n_cols()`.
    fn column(&self, j: usize) -> Result<Column<'_>>;

    /// Total number of stored entries
    fn nnz(&self) -> usize {
        (0..self.n_cols())
            .filter_map(|j| self.column(j).ok())
            .map(|col| col.len())
            .sum()
    }
}

/// Borrowed view of one matrix column.
///
/// `Column` is `Copy`; every call to [`Column::iter`] starts a fresh pass.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    rows: &'a [usize],
    values: &'a [f64],
}

impl<'a> Column<'a> {
    /// Wrap parallel row-index and value slices
    ///
    /// Callers guarantee equal lengths and strictly increasing rows.
    pub fn new(rows: &'a [usize], values: &'a [f64]) -> Self {
        debug_assert_eq!(rows.len(), values.len());
        Self { rows, values }
    }

    /// Iterate `(row, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + 'a {
        self.rows.iter().copied().zip(self.values.iter().copied())
    }

    pub fn rows(&self) -> &'a [usize] {
        self.rows
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for Column<'a> {
    type Item = (usize, f64);
    type IntoIter = std::iter::Zip<
        std::iter::Copied<std::slice::Iter<'a, usize>>,
        std::iter::Copied<std::slice::Iter<'a, f64>>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter().copied().zip(self.values.iter().copied())
    }
}
