//! Compressed sparse column matrix
//!
//! Column `j` occupies `row_indices[col_ptr[j]..col_ptr[j + 1]]` and the
//! matching slice of `values`. Row indices within a column are strictly
//! increasing, so each (row, column) pair appears at most once.

use crate::core::{CdnError, Column, Result, SparseMatrixView, SparseVector};

/// Immutable CSC design matrix
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix {
    n_rows: usize,
    n_cols: usize,
    col_ptr: Vec<usize>,
    row_indices: Vec<usize>,
    values: Vec<f64>,
}

impl CscMatrix {
    /// Build from raw CSC arrays, validating every structural invariant
    pub fn from_parts(
        n_rows: usize,
        n_cols: usize,
        col_ptr: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if col_ptr.len() != n_cols + 1 {
            return Err(CdnError::InvalidMatrix(format!(
                "col_ptr has {} entries, expected {}",
                col_ptr.len(),
                n_cols + 1
            )));
        }
        if row_indices.len() != values.len() {
            return Err(CdnError::InvalidMatrix(format!(
                "{} row indices but {} values",
                row_indices.len(),
                values.len()
            )));
        }
        if col_ptr[0] != 0 || col_ptr[n_cols] != values.len() {
            return Err(CdnError::InvalidMatrix(
                "col_ptr must start at 0 and end at nnz".to_string(),
            ));
        }

        if let Some(j) = col_ptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(CdnError::InvalidMatrix(format!(
                "col_ptr decreases at column {j}"
            )));
        }
        if let Some(&p) = col_ptr.iter().find(|&&p| p > values.len()) {
            return Err(CdnError::InvalidMatrix(format!(
                "col_ptr entry {p} exceeds nnz {}",
                values.len()
            )));
        }

        for j in 0..n_cols {
            let (start, end) = (col_ptr[j], col_ptr[j + 1]);
            let rows = &row_indices[start..end];
            if let Some(&r) = rows.iter().find(|&&r| r >= n_rows) {
                return Err(CdnError::InvalidMatrix(format!(
                    "row index {r} out of range in column {j}"
                )));
            }
            if rows.windows(2).any(|w| w[0] >= w[1]) {
                return Err(CdnError::InvalidMatrix(format!(
                    "row indices not strictly increasing in column {j}"
                )));
            }
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(CdnError::InvalidMatrix(
                "matrix contains non-finite values".to_string(),
            ));
        }

        Ok(Self {
            n_rows,
            n_cols,
            col_ptr,
            row_indices,
            values,
        })
    }

    /// Build from sparse rows; `n_cols` must exceed every row's largest index
    pub fn from_rows(rows: &[SparseVector], n_cols: usize) -> Result<Self> {
        let mut counts = vec![0usize; n_cols];
        for row in rows {
            if let Some(max) = row.max_index() {
                if max >= n_cols {
                    return Err(CdnError::InvalidDimension {
                        index: max,
                        bound: n_cols,
                    });
                }
            }
            for (&j, &v) in row.indices.iter().zip(&row.values) {
                if v != 0.0 {
                    counts[j] += 1;
                }
            }
        }

        let mut col_ptr = Vec::with_capacity(n_cols + 1);
        col_ptr.push(0);
        for &count in &counts {
            let last = col_ptr[col_ptr.len() - 1];
            col_ptr.push(last + count);
        }

        let nnz = col_ptr[n_cols];
        let mut row_indices = vec![0usize; nnz];
        let mut values = vec![0.0; nnz];
        let mut next = col_ptr[..n_cols].to_vec();

        // Rows are visited in order, so each column fills with increasing rows
        for (i, row) in rows.iter().enumerate() {
            for (&j, &v) in row.indices.iter().zip(&row.values) {
                if v != 0.0 {
                    row_indices[next[j]] = i;
                    values[next[j]] = v;
                    next[j] += 1;
                }
            }
        }

        Self::from_parts(rows.len(), n_cols, col_ptr, row_indices, values)
    }

    /// Build from dense rows, dropping explicit zeros
    pub fn from_dense(rows: &[Vec<f64>]) -> Result<Self> {
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut sparse_rows = Vec::with_capacity(rows.len());

        for row in rows {
            if row.len() != n_cols {
                return Err(CdnError::DimensionMismatch {
                    expected: n_cols,
                    actual: row.len(),
                });
            }
            let (indices, values): (Vec<_>, Vec<_>) = row
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v != 0.0)
                .map(|(j, &v)| (j, v))
                .unzip();
            sparse_rows.push(SparseVector::new(indices, values)?);
        }

        Self::from_rows(&sparse_rows, n_cols)
    }

    /// Entry (i, j), zero when not stored
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        let col = self.column(j)?;
        Ok(match col.rows().binary_search(&i) {
            Ok(pos) => col.values()[pos],
            Err(_) => 0.0,
        })
    }

    /// Fraction of entries that are stored
    pub fn density(&self) -> f64 {
        let cells = self.n_rows * self.n_cols;
        if cells == 0 {
            0.0
        } else {
            self.values.len() as f64 / cells as f64
        }
    }
}

impl SparseMatrixView for CscMatrix {
    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn n_cols(&self) -> usize {
        self.n_cols
    }

    fn column(&self, j: usize) -> Result<Column<'_>> {
        if j >= self.n_cols {
            return Err(CdnError::InvalidDimension {
                index: j,
                bound: self.n_cols,
            });
        }
        let (start, end) = (self.col_ptr[j], self.col_ptr[j + 1]);
        Ok(Column::new(
            &self.row_indices[start..end],
            &self.values[start..end],
        ))
    }

    fn nnz(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_matrix() -> CscMatrix {
        CscMatrix::from_dense(&[
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_from_dense_layout() {
        let x = example_matrix();

        assert_eq!(x.n_rows(), 4);
        assert_eq!(x.n_cols(), 2);
        assert_eq!(x.nnz(), 4);
        assert_eq!(x.density(), 0.5);

        let col0: Vec<_> = x.column(0).unwrap().iter().collect();
        assert_eq!(col0, vec![(0, 1.0), (2, 1.0)]);
        let col1: Vec<_> = x.column(1).unwrap().into_iter().collect();
        assert_eq!(col1, vec![(1, 1.0), (2, 1.0)]);
    }

    #[test]
    fn test_column_is_restartable() {
        let x = example_matrix();
        let col = x.column(1).unwrap();

        let first: f64 = col.iter().map(|(_, v)| v).sum();
        let second: f64 = col.iter().map(|(_, v)| v).sum();
        assert_eq!(first, second);
        assert_eq!(col.len(), 2);
    }

    #[test]
    fn test_column_out_of_range() {
        let x = example_matrix();
        assert!(matches!(
            x.column(2),
            Err(CdnError::InvalidDimension { index: 2, bound: 2 })
        ));
    }

    #[test]
    fn test_get_entries() {
        let x = example_matrix();
        assert_eq!(x.get(2, 1).unwrap(), 1.0);
        assert_eq!(x.get(3, 0).unwrap(), 0.0);
        assert!(x.get(0, 5).is_err());
    }

    #[test]
    fn test_from_rows_rejects_wide_rows() {
        let rows = vec![SparseVector::new(vec![0, 3], vec![1.0, 1.0]).unwrap()];
        assert!(matches!(
            CscMatrix::from_rows(&rows, 3),
            Err(CdnError::InvalidDimension { index: 3, bound: 3 })
        ));
    }

    #[test]
    fn test_from_rows_drops_explicit_zeros() {
        let rows = vec![
            SparseVector::new(vec![0, 1], vec![0.0, 2.0]).unwrap(),
            SparseVector::new(vec![0], vec![3.0]).unwrap(),
        ];
        let x = CscMatrix::from_rows(&rows, 2).unwrap();

        assert_eq!(x.nnz(), 2);
        assert_eq!(x.column(0).unwrap().rows(), &[1]);
    }

    #[test]
    fn test_from_parts_validation() {
        // Valid 2x2 identity
        assert!(CscMatrix::from_parts(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 1.0]).is_ok());

        // Unsorted rows within a column
        assert!(matches!(
            CscMatrix::from_parts(3, 1, vec![0, 2], vec![2, 0], vec![1.0, 1.0]),
            Err(CdnError::InvalidMatrix(_))
        ));
        // Duplicate row
        assert!(CscMatrix::from_parts(3, 1, vec![0, 2], vec![1, 1], vec![1.0, 1.0]).is_err());
        // Row out of range
        assert!(CscMatrix::from_parts(2, 1, vec![0, 1], vec![2], vec![1.0]).is_err());
        // Bad pointer length
        assert!(CscMatrix::from_parts(2, 2, vec![0, 1], vec![0], vec![1.0]).is_err());
        // Non-finite value
        assert!(CscMatrix::from_parts(1, 1, vec![0, 1], vec![0], vec![f64::NAN]).is_err());
        // Inner pointer past nnz
        assert!(matches!(
            CscMatrix::from_parts(3, 2, vec![0, 5, 2], vec![0, 1], vec![1.0, 1.0]),
            Err(CdnError::InvalidMatrix(_))
        ));
        // Decreasing pointers
        assert!(matches!(
            CscMatrix::from_parts(3, 3, vec![0, 2, 1, 2], vec![0, 1], vec![1.0, 1.0]),
            Err(CdnError::InvalidMatrix(_))
        ));
    }

    #[test]
    fn test_from_dense_ragged_rows() {
        let result = CscMatrix::from_dense(&[vec![1.0, 0.0], vec![1.0]]);
        assert!(matches!(
            result,
            Err(CdnError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }
}
