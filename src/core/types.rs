//! Core type definitions for the CDN solver

use crate::core::{CdnError, Result};
use serde::{Deserialize, Serialize};

/// Sparse row vector with strictly increasing indices
#[derive(Clone, Debug, PartialEq)]
pub struct SparseVector {
    /// Sorted indices of non-zero elements
    pub indices: Vec<usize>,
    /// Values corresponding to indices
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Create a sparse vector, sorting by index
    ///
    /// Fails on length mismatch or a repeated index.
    pub fn new(indices: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(CdnError::DimensionMismatch {
                expected: indices.len(),
                actual: values.len(),
            });
        }

        let mut pairs: Vec<_> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|&(idx, _)| idx);

        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(CdnError::InvalidMatrix(format!(
                "duplicate index {} in sparse vector",
                w[0].0
            )));
        }

        let (indices, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Ok(Self { indices, values })
    }

    /// Create an empty sparse vector
    pub fn empty() -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Value at `index` (0 if not stored)
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Dot product with a dense vector; indices past its end count as zero
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.indices
            .iter()
            .zip(&self.values)
            .filter_map(|(&i, &v)| dense.get(i).map(|&w| w * v))
            .sum()
    }

    /// Largest stored index, if any
    pub fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Hyperparameters fixed for the lifetime of a solver instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Weight of the logistic loss relative to the L1 penalty
    pub c: f64,
    /// Lower bound applied to every weight
    pub lower: f64,
    /// Upper bound applied to every weight
    pub upper: f64,
    /// Permanently drop coordinates that look settled at zero or a bound
    pub do_elimination: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            lower: -1e6,
            upper: 1e6,
            do_elimination: false,
        }
    }
}

impl SolverConfig {
    pub fn new(c: f64, lower: f64, upper: f64, do_elimination: bool) -> Result<Self> {
        let config = Self {
            c,
            lower,
            upper,
            do_elimination,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check C > 0 and lower <= 0 <= upper with lower < upper
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(CdnError::InvalidHyperparameter(format!(
                "C must be positive and finite, got {}",
                self.c
            )));
        }
        if self.lower.is_nan() || self.upper.is_nan() || self.lower >= self.upper {
            return Err(CdnError::InvalidHyperparameter(format!(
                "lower must be below upper, got [{}, {}]",
                self.lower, self.upper
            )));
        }
        if self.lower > 0.0 || self.upper < 0.0 {
            return Err(CdnError::InvalidHyperparameter(format!(
                "bounds [{}, {}] must contain zero",
                self.lower, self.upper
            )));
        }
        Ok(())
    }

    /// Clamp a weight into the box
    pub fn clamp(&self, w: f64) -> f64 {
        w.clamp(self.lower, self.upper)
    }
}

/// Per-call algorithm controls for `fit`
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    /// Stop once |Δobjective| / max(1, |previous|) falls below this
    pub tol: f64,
    /// Hard cap on epochs
    pub max_epochs: usize,
    /// Never stop on tolerance before this many epochs
    pub min_epochs: usize,
    /// Visit active coordinates in a fresh random permutation each epoch
    pub randomize: bool,
    /// Seed for the permutation RNG; `None` draws from entropy
    pub seed: Option<u64>,
    /// Progress logging level (0 = quiet)
    pub verbose: u8,
    /// Warm-start weights
    pub init_w: Option<Vec<f64>>,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            tol: 1e-5,
            max_epochs: 200,
            min_epochs: 0,
            randomize: false,
            seed: None,
            verbose: 0,
            init_w: None,
        }
    }
}

impl FitOptions {
    pub fn new(tol: f64, max_epochs: usize, randomize: bool) -> Self {
        Self {
            tol,
            max_epochs,
            randomize,
            ..Self::default()
        }
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    pub fn with_min_epochs(mut self, min_epochs: usize) -> Self {
        self.min_epochs = min_epochs;
        self
    }

    pub fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_init_w(mut self, init_w: Vec<f64>) -> Self {
        self.init_w = Some(init_w);
        self
    }

    /// Validate against `n_features` columns and the solver's bounds
    pub fn validate(&self, n_features: usize, config: &SolverConfig) -> Result<()> {
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(CdnError::InvalidHyperparameter(format!(
                "tol must be positive, got {}",
                self.tol
            )));
        }
        if self.max_epochs < 1 {
            return Err(CdnError::InvalidHyperparameter(
                "max_epochs must be at least 1".to_string(),
            ));
        }
        if self.min_epochs > self.max_epochs {
            return Err(CdnError::InvalidHyperparameter(format!(
                "min_epochs ({}) exceeds max_epochs ({})",
                self.min_epochs, self.max_epochs
            )));
        }
        if let Some(init_w) = &self.init_w {
            if init_w.len() != n_features {
                return Err(CdnError::DimensionMismatch {
                    expected: n_features,
                    actual: init_w.len(),
                });
            }
            if let Some(bad) = init_w
                .iter()
                .find(|&&w| !w.is_finite() || w < config.lower || w > config.upper)
            {
                return Err(CdnError::InvalidHyperparameter(format!(
                    "initial weight {} outside [{}, {}]",
                    bad, config.lower, config.upper
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of one `fit` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Final weight vector
    pub weights: Vec<f64>,
    /// Number of epochs run
    pub epochs: usize,
    /// Whether the tolerance test stopped the run (as opposed to `max_epochs`)
    pub converged: bool,
    /// Objective at the starting weights
    pub initial_objective: f64,
    /// Objective after the last epoch
    pub objective: f64,
    /// Objective after each epoch, in order
    pub objective_history: Vec<f64>,
    /// Coordinates still active at the end
    pub n_active: usize,
    /// Coordinates removed by elimination
    pub n_eliminated: usize,
    /// Coordinate updates abandoned after exhausting backtracking
    pub line_search_failures: usize,
    /// Largest optimality violation seen during the last epoch
    pub max_violation: f64,
}

impl FitResult {
    /// Number of exactly-zero weights
    pub fn n_zero_weights(&self) -> usize {
        self.weights.iter().filter(|&&w| w == 0.0).count()
    }
}
