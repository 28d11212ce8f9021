//! High-level API for L1-regularized logistic regression
//!
//! [`CDN`] wraps the solver in a model object that starts unfitted, becomes
//! fitted after a successful [`CDN::fit`], and then answers queries.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cycdn::api::CDN;
//! use cycdn::{FitOptions, LibSvmData};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let train = LibSvmData::from_file("train.libsvm")?;
//!
//! let mut model = CDN::new(1.0, -1e6, 1e6, false)?;
//! model.fit(&train.x, &train.y, &FitOptions::new(1e-5, 200, true))?;
//!
//! let weights = model.get_weights()?;
//! let probs = model.predict_probabilities(&train.x)?;
//! println!("{} weights, P(y=+1) for first row: {:.3}", weights.len(), probs[0][1]);
//! # Ok(())
//! # }
//! ```

use crate::core::{CdnError, FitOptions, FitResult, Result, SolverConfig, SparseMatrixView};
use crate::objective::{linear_predictor, sigmoid};
use crate::solver::CdnSolver;

/// Lifecycle of a [`CDN`] model
///
/// Fitting happens entirely inside [`CDN::fit`]; callers only ever see the
/// model before its first successful fit or after one.
#[derive(Debug, Clone)]
enum ModelState {
    Unfitted,
    Fitted(FitResult),
}

/// L1-regularized logistic regression trained by coordinate descent Newton
#[derive(Debug, Clone)]
pub struct CDN {
    solver: CdnSolver,
    state: ModelState,
}

impl CDN {
    /// Create an unfitted model; fails on C <= 0, lower >= upper, or bounds
    /// that exclude zero
    pub fn new(c: f64, lower: f64, upper: f64, do_elimination: bool) -> Result<Self> {
        Self::from_config(SolverConfig::new(c, lower, upper, do_elimination)?)
    }

    pub fn from_config(config: SolverConfig) -> Result<Self> {
        Ok(Self {
            solver: CdnSolver::new(config)?,
            state: ModelState::Unfitted,
        })
    }

    /// Rebuild a fitted model from a stored fit
    pub(crate) fn from_fit(config: SolverConfig, result: FitResult) -> Result<Self> {
        let mut model = Self::from_config(config)?;
        model.state = ModelState::Fitted(result);
        Ok(model)
    }

    pub fn config(&self) -> &SolverConfig {
        self.solver.config()
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.state, ModelState::Fitted(_))
    }

    /// Train on `x` (instances × features) and ±1 labels `y`
    ///
    /// On error the model keeps whatever state it had before the call.
    pub fn fit<M: SparseMatrixView>(
        &mut self,
        x: &M,
        y: &[f64],
        options: &FitOptions,
    ) -> Result<&FitResult> {
        let result = self.solver.solve(x, y, options)?;
        self.state = ModelState::Fitted(result);
        self.fit_result()
    }

    /// Summary of the last successful fit
    pub fn fit_result(&self) -> Result<&FitResult> {
        match &self.state {
            ModelState::Fitted(result) => Ok(result),
            ModelState::Unfitted => Err(CdnError::NotFitted),
        }
    }

    /// Copy of the fitted weight vector
    pub fn get_weights(&self) -> Result<Vec<f64>> {
        Ok(self.fit_result()?.weights.clone())
    }

    /// Number of features the model was fitted on
    pub fn n_features(&self) -> Result<usize> {
        Ok(self.fit_result()?.weights.len())
    }

    /// Raw scores `w · x_i`
    pub fn decision_function<M: SparseMatrixView>(&self, x: &M) -> Result<Vec<f64>> {
        let weights = &self.fit_result()?.weights;
        if x.n_cols() != weights.len() {
            return Err(CdnError::DimensionMismatch {
                expected: weights.len(),
                actual: x.n_cols(),
            });
        }
        linear_predictor(x, weights)
    }

    /// `[P(y = -1), P(y = +1)]` for every row of `x`
    pub fn predict_probabilities<M: SparseMatrixView>(&self, x: &M) -> Result<Vec<[f64; 2]>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|z| [sigmoid(-z), sigmoid(z)])
            .collect())
    }

    /// Most probable label per row; an exact tie goes to -1
    pub fn predict<M: SparseMatrixView>(&self, x: &M) -> Result<Vec<f64>> {
        Ok(self
            .predict_probabilities(x)?
            .into_iter()
            .map(|[neg, pos]| if pos > neg { 1.0 } else { -1.0 })
            .collect())
    }

    /// Confusion counts of `predict(x)` against ±1 labels `y`
    pub fn evaluate<M: SparseMatrixView>(&self, x: &M, y: &[f64]) -> Result<EvaluationMetrics> {
        if x.n_rows() != y.len() {
            return Err(CdnError::DimensionMismatch {
                expected: x.n_rows(),
                actual: y.len(),
            });
        }
        crate::solver::validate_labels(y)?;

        let predictions = self.predict(x)?;
        let mut metrics = EvaluationMetrics::default();
        for (&pred, &actual) in predictions.iter().zip(y) {
            match (pred > 0.0, actual > 0.0) {
                (true, true) => metrics.true_positives += 1,
                (false, false) => metrics.true_negatives += 1,
                (true, false) => metrics.false_positives += 1,
                (false, true) => metrics.false_negatives += 1,
            }
        }
        Ok(metrics)
    }
}

/// Confusion-matrix counts for a ±1 classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// (TP + TN) / total
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// (FP + FN) / total
    pub fn error_rate(&self) -> f64 {
        ratio(self.false_positives + self.false_negatives, self.total())
    }

    /// TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    /// TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
