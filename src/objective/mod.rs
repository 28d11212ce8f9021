//! L1-regularized logistic objective
//!
//! Stable logistic primitives plus the evaluator that the solver queries
//! for per-coordinate derivatives and line-search probes.

pub mod evaluator;
pub mod logistic;

pub use self::evaluator::*;
pub use self::logistic::*;
