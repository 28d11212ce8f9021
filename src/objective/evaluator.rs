//! Regularized logistic objective with an incremental predictor cache
//!
//! The objective minimized is
//!
//! ```text
//! F(w) = C · Σ_i log(1 + exp(-y_i · z_i)) + Σ_j |w_j|,    z_i = w · x_i
//! ```
//!
//! `z` is kept up to date by [`ObjectiveEvaluator::apply_step`], so the
//! per-coordinate derivatives and line-search probes only touch the nonzero
//! entries of one column.

use crate::core::{CdnError, Result, SparseMatrixView};
use crate::objective::logistic::{logistic_loss, sigmoid};

/// Added to every coordinate Hessian so the Newton step is always defined
pub const HESSIAN_FLOOR: f64 = 1e-12;

/// First and second derivative of the smooth loss along one coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateDerivatives {
    pub gradient: f64,
    pub hessian: f64,
}

/// Loss evaluator owning the cached linear predictor `z`
pub struct ObjectiveEvaluator<'a, M: SparseMatrixView> {
    x: &'a M,
    y: &'a [f64],
    c: f64,
    z: Vec<f64>,
}

impl<'a, M: SparseMatrixView> ObjectiveEvaluator<'a, M> {
    /// Create an evaluator and fill the cache from `w`
    pub fn new(x: &'a M, y: &'a [f64], c: f64, w: &[f64]) -> Result<Self> {
        if y.len() != x.n_rows() {
            return Err(CdnError::DimensionMismatch {
                expected: x.n_rows(),
                actual: y.len(),
            });
        }
        let z = linear_predictor(x, w)?;
        Ok(Self { x, y, c, z })
    }

    /// Cached `z_i = w · x_i`
    pub fn predictors(&self) -> &[f64] {
        &self.z
    }

    /// Smooth part only: C · Σ log(1 + exp(-y z))
    pub fn loss(&self) -> f64 {
        self.c
            * self
                .y
                .iter()
                .zip(&self.z)
                .map(|(&y, &z)| logistic_loss(y * z))
                .sum::<f64>()
    }

    /// Full objective at `w`; `w` must be the vector the cache tracks
    pub fn objective(&self, w: &[f64]) -> f64 {
        self.loss() + l1_norm(w)
    }

    /// Gradient and Hessian of the smooth loss with respect to `w_j`
    pub fn coordinate_gradient_hessian(&self, j: usize) -> Result<CoordinateDerivatives> {
        let mut gradient = 0.0;
        let mut hessian = 0.0;

        for (i, v) in self.x.column(j)? {
            let y = self.y[i];
            let tau = sigmoid(y * self.z[i]);
            gradient += v * y * (tau - 1.0);
            hessian += v * v * tau * (1.0 - tau);
        }

        Ok(CoordinateDerivatives {
            gradient: self.c * gradient,
            hessian: self.c * hessian + HESSIAN_FLOOR,
        })
    }

    /// Change in the smooth loss if `w_j` moved by `step`, cache untouched
    pub fn loss_change(&self, j: usize, step: f64) -> Result<f64> {
        let mut change = 0.0;
        for (i, v) in self.x.column(j)? {
            let y = self.y[i];
            let z = self.z[i];
            change += logistic_loss(y * (z + step * v)) - logistic_loss(y * z);
        }
        Ok(self.c * change)
    }

    /// Commit a move of `w_j` by `step` into the cache
    pub fn apply_step(&mut self, j: usize, step: f64) -> Result<()> {
        for (i, v) in self.x.column(j)? {
            self.z[i] += step * v;
        }
        Ok(())
    }
}

/// Σ |w_j|
pub fn l1_norm(w: &[f64]) -> f64 {
    w.iter().map(|v| v.abs()).sum()
}

/// Compute `X · w` from scratch by walking columns
pub fn linear_predictor<M: SparseMatrixView>(x: &M, w: &[f64]) -> Result<Vec<f64>> {
    if w.len() != x.n_cols() {
        return Err(CdnError::DimensionMismatch {
            expected: x.n_cols(),
            actual: w.len(),
        });
    }

    let mut z = vec![0.0; x.n_rows()];
    for (j, &wj) in w.iter().enumerate() {
        if wj == 0.0 {
            continue;
        }
        for (i, v) in x.column(j)? {
            z[i] += wj * v;
        }
    }
    Ok(z)
}
