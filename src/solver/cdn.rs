//! Coordinate Descent Newton solver
//!
//! Each epoch sweeps the active coordinates once, in ascending order or in a
//! freshly shuffled order. For every coordinate the solver takes the
//! loss derivatives from the cached predictors, asks the line search for a
//! step, and folds the accepted step back into the cache. Sweeps are
//! strictly sequential: every update changes `z`, and the next coordinate's
//! derivatives must see it.

use crate::core::{CdnError, FitOptions, FitResult, Result, SolverConfig, SparseMatrixView};
use crate::objective::ObjectiveEvaluator;
use crate::solver::elimination::EliminationTracker;
use crate::solver::line_search::{LineSearch, StepOutcome};
use log::{debug, info, log, log_enabled, trace, warn, Level};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// CDN solver for L1-regularized logistic regression
#[derive(Debug, Clone)]
pub struct CdnSolver {
    config: SolverConfig,
    line_search: LineSearch,
}

impl CdnSolver {
    /// Create a solver; fails if the hyperparameters are invalid
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            line_search: LineSearch::default(),
        })
    }

    /// Replace the line-search constants
    pub fn with_line_search(mut self, line_search: LineSearch) -> Self {
        self.line_search = line_search;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn line_search(&self) -> &LineSearch {
        &self.line_search
    }

    /// Minimize the objective on `(x, y)`
    ///
    /// All inputs are validated before any work is done.
    pub fn solve<M: SparseMatrixView>(
        &self,
        x: &M,
        y: &[f64],
        options: &FitOptions,
    ) -> Result<FitResult> {
        if x.n_rows() != y.len() {
            return Err(CdnError::DimensionMismatch {
                expected: x.n_rows(),
                actual: y.len(),
            });
        }
        validate_labels(y)?;
        options.validate(x.n_cols(), &self.config)?;

        let p = x.n_cols();
        let SolverConfig {
            c,
            lower,
            upper,
            do_elimination,
        } = self.config;

        let mut w = options.init_w.clone().unwrap_or_else(|| vec![0.0; p]);
        let mut eval = ObjectiveEvaluator::new(x, y, c, &w)?;
        let mut tracker = EliminationTracker::new(p, y.len(), do_elimination);
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let initial_objective = eval.objective(&w);
        let mut previous = initial_objective;
        let mut history = Vec::new();
        let mut line_search_failures = 0;
        let mut converged = false;
        let mut epochs = 0;

        debug!(
            "CDN fit: {} instances, {} features, C={}, bounds=[{}, {}], elimination={}",
            y.len(),
            p,
            c,
            lower,
            upper,
            do_elimination
        );

        while epochs < options.max_epochs {
            epochs += 1;

            let mut order = tracker.active_indices();
            if options.randomize {
                order.shuffle(&mut rng);
            }

            tracker.begin_epoch();
            let mut updated = 0;

            for &j in &order {
                let derivatives = eval.coordinate_gradient_hessian(j)?;
                if tracker.observe(j, w[j], derivatives.gradient, lower, upper) {
                    continue;
                }

                match self
                    .line_search
                    .search(&eval, j, w[j], derivatives, lower, upper)?
                {
                    StepOutcome::Accepted { step, weight, .. } => {
                        eval.apply_step(j, step)?;
                        w[j] = weight;
                        debug_assert!(lower <= w[j] && w[j] <= upper);
                        updated += 1;
                    }
                    StepOutcome::Exhausted => {
                        line_search_failures += 1;
                        trace!("epoch {epochs}: line search exhausted on feature {j}");
                    }
                    StepOutcome::Stationary => {}
                }
            }

            let eliminated = tracker.end_epoch();
            let current = eval.objective(&w);
            let relative_change = (previous - current).abs() / previous.abs().max(1.0);
            history.push(current);

            let level = if options.verbose >= 2 {
                Level::Info
            } else {
                Level::Debug
            };
            if log_enabled!(level) {
                log!(
                    level,
                    "epoch {}: objective={:.10} rel_change={:.3e} updated={} active={} eliminated={} max_violation={:.3e}",
                    epochs,
                    current,
                    relative_change,
                    updated,
                    tracker.n_active(),
                    eliminated,
                    tracker.last_max_violation()
                );
            }

            previous = current;
            if epochs >= options.min_epochs && relative_change < options.tol {
                converged = true;
                break;
            }
        }

        let result = FitResult {
            weights: w,
            epochs,
            converged,
            initial_objective,
            objective: previous,
            objective_history: history,
            n_active: tracker.n_active(),
            n_eliminated: tracker.n_eliminated(),
            line_search_failures,
            max_violation: tracker.last_max_violation(),
        };

        if !converged {
            warn!(
                "CDN reached max_epochs={} without meeting tol={}",
                options.max_epochs, options.tol
            );
        }

        if options.verbose >= 1 {
            info!(
                "CDN finished after {} epochs (converged={}): objective={:.10}, nonzeros={}/{}, eliminated={}",
                result.epochs,
                result.converged,
                result.objective,
                p - result.n_zero_weights(),
                p,
                result.n_eliminated
            );
        } else {
            debug!(
                "CDN finished after {} epochs (converged={}): objective={:.10}",
                result.epochs, result.converged, result.objective
            );
        }

        Ok(result)
    }
}

/// Reject any label other than exactly -1 or +1
pub fn validate_labels(y: &[f64]) -> Result<()> {
    match y
        .iter()
        .enumerate()
        .find(|&(_, &v)| v != 1.0 && v != -1.0)
    {
        Some((index, &value)) => Err(CdnError::InvalidLabel { index, value }),
        None => Ok(()),
    }
}
