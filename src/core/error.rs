//! Error types for the CDN solver

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CdnError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid label at instance {index}: expected -1 or +1, got {value}")]
    InvalidLabel { index: usize, value: f64 },

    #[error("Invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    #[error("Model not fitted")]
    NotFitted,

    #[error("Feature index {index} out of range for {bound} columns")]
    InvalidDimension { index: usize, bound: usize },

    #[error("Invalid sparse matrix: {0}")]
    InvalidMatrix(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CdnError>;
