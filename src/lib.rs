//! Coordinate Descent Newton (CDN) for L1-regularized logistic regression
//!
//! Minimizes
//!
//! ```text
//! F(w) = C · Σ_i log(1 + exp(-y_i · w·x_i)) + ‖w‖₁
//! ```
//!
//! over a box `lower <= w_j <= upper`, one coordinate at a time, following
//! Yuan, Chang, Hsieh and Lin, "A Comparison of Optimization Methods and
//! Software for Large-scale L1-regularized Linear Classification" (JMLR 2010).

pub mod api;
pub mod core;
pub mod data;
pub mod objective;
pub mod persistence;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, CDN};
pub use crate::core::error::*;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::{CscMatrix, LibSvmData};
pub use crate::objective::ObjectiveEvaluator;
pub use crate::persistence::SerializableModel;
pub use crate::solver::{CdnSolver, EliminationTracker, LineSearch, StepOutcome};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
