//! Newton direction and backtracking line search for one coordinate
//!
//! The direction minimizes the one-dimensional model
//!
//! ```text
//! q(d) = g·d + ½·h·d² + |w + d| - |w|
//! ```
//!
//! restricted to `lower <= w + d <= upper`. The step is accepted once the
//! true change in the objective satisfies
//!
//! ```text
//! F(w + β·d) - F(w) <= σ · β · (g·d + |w + d| - |w|)
//! ```
//!
//! with β halved on every rejection.

use crate::core::{Result, SparseMatrixView};
use crate::objective::{CoordinateDerivatives, ObjectiveEvaluator};

/// Directions shorter than this are treated as "already optimal"
pub const MIN_DIRECTION: f64 = 1e-12;

/// Result of a line search on one coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Move `w_j` by `step` to `weight`
    Accepted {
        step: f64,
        weight: f64,
        backtracks: usize,
    },
    /// The Newton direction is zero; nothing to do
    Stationary,
    /// No trial step met the decrease condition
    Exhausted,
}

/// Armijo backtracking with L1 kink handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSearch {
    /// Sufficient-decrease constant σ
    pub sigma: f64,
    /// Backtracking factor β
    pub beta: f64,
    /// Trial steps before giving up
    pub max_steps: usize,
}

impl Default for LineSearch {
    fn default() -> Self {
        Self {
            sigma: 0.01,
            beta: 0.5,
            max_steps: 20,
        }
    }
}

impl LineSearch {
    /// Bounded Newton direction for the L1-penalized coordinate model
    ///
    /// Soft-thresholds the unconstrained Newton step at the kink, then clips
    /// so that `w + d` stays inside `[lower, upper]`.
    pub fn newton_direction(w: f64, g: f64, h: f64, lower: f64, upper: f64) -> f64 {
        let g_plus = g + 1.0;
        let g_minus = g - 1.0;

        let d = if g_plus < h * w {
            -g_plus / h
        } else if g_minus > h * w {
            -g_minus / h
        } else {
            -w
        };

        (w + d).clamp(lower, upper) - w
    }

    /// Find a step for coordinate `j` currently at `w`
    pub fn search<M: SparseMatrixView>(
        &self,
        eval: &ObjectiveEvaluator<'_, M>,
        j: usize,
        w: f64,
        derivatives: CoordinateDerivatives,
        lower: f64,
        upper: f64,
    ) -> Result<StepOutcome> {
        let CoordinateDerivatives { gradient, hessian } = derivatives;
        let d = Self::newton_direction(w, gradient, hessian, lower, upper);

        if d.abs() < MIN_DIRECTION {
            return Ok(StepOutcome::Stationary);
        }

        // Predicted decrease; negative because d minimizes q and h > 0
        let delta = gradient * d + (w + d).abs() - w.abs();

        let trial = |beta: f64| -> Result<(f64, f64, f64)> {
            let weight = (w + beta * d).clamp(lower, upper);
            let step = weight - w;
            let change = eval.loss_change(j, step)? + weight.abs() - w.abs();
            Ok((weight, step, change))
        };

        let (full_weight, full_step, full_change) = trial(1.0)?;

        // Crossing zero: landing exactly on the kink may beat the full step
        if w != 0.0 && full_weight != 0.0 && full_weight.signum() != w.signum() {
            let to_zero = eval.loss_change(j, -w)? - w.abs();
            if to_zero < 0.0 && to_zero <= full_change {
                return Ok(StepOutcome::Accepted {
                    step: -w,
                    weight: 0.0,
                    backtracks: 0,
                });
            }
        }

        if full_change <= self.sigma * delta {
            return Ok(StepOutcome::Accepted {
                step: full_step,
                weight: full_weight,
                backtracks: 0,
            });
        }

        let mut beta = 1.0;
        for attempt in 1..self.max_steps {
            beta *= self.beta;
            let (weight, step, change) = trial(beta)?;
            if change <= self.sigma * beta * delta {
                return Ok(StepOutcome::Accepted {
                    step,
                    weight,
                    backtracks: attempt,
                });
            }
        }

        Ok(StepOutcome::Exhausted)
    }
}
