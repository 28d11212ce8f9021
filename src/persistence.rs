//! Model serialization and persistence
//!
//! A fitted [`CDN`] is stored as pretty-printed JSON holding the solver
//! configuration, the full fit summary and some metadata for bookkeeping.

use crate::api::CDN;
use crate::core::{CdnError, FitResult, Result, SolverConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableModel {
    /// Hyperparameters the model was fitted with
    pub config: SolverConfig,
    /// Weights and convergence summary
    pub fit: FitResult,
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    pub n_features: usize,
    /// Number of nonzero weights
    pub n_nonzero: usize,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl SerializableModel {
    /// Snapshot a fitted model; fails with `NotFitted` otherwise
    pub fn from_model(model: &CDN) -> Result<Self> {
        let fit = model.fit_result()?.clone();
        let n_features = fit.weights.len();
        let n_nonzero = n_features - fit.n_zero_weights();

        Ok(Self {
            config: model.config().clone(),
            fit,
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                n_features,
                n_nonzero,
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        })
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| CdnError::Serialization(e.to_string()))?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let model: Self = serde_json::from_reader(reader)
            .map_err(|e| CdnError::Serialization(e.to_string()))?;
        Ok(model)
    }

    /// Rebuild a fitted model ready for prediction
    pub fn to_model(&self) -> Result<CDN> {
        self.config.validate()?;
        if self.metadata.n_features != self.fit.weights.len() {
            return Err(CdnError::DimensionMismatch {
                expected: self.metadata.n_features,
                actual: self.fit.weights.len(),
            });
        }
        if let Some(w) = self.fit.weights.iter().find(|w| !w.is_finite()) {
            return Err(CdnError::Serialization(format!(
                "stored weight {w} is not finite"
            )));
        }
        let (lower, upper) = (self.config.lower, self.config.upper);
        if let Some(w) = self
            .fit
            .weights
            .iter()
            .find(|&&w| w < lower || w > upper)
        {
            return Err(CdnError::Serialization(format!(
                "stored weight {w} outside [{lower}, {upper}]"
            )));
        }
        CDN::from_fit(self.config.clone(), self.fit.clone())
    }
}

impl fmt::Display for SerializableModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== CDN Model Summary ===")?;
        writeln!(
            f,
            "Features: {} ({} nonzero)",
            self.metadata.n_features, self.metadata.n_nonzero
        )?;
        writeln!(f, "C: {}", self.config.c)?;
        writeln!(f, "Bounds: [{}, {}]", self.config.lower, self.config.upper)?;
        writeln!(f, "Elimination: {}", self.config.do_elimination)?;
        writeln!(
            f,
            "Epochs: {} (converged: {})",
            self.fit.epochs, self.fit.converged
        )?;
        writeln!(f, "Objective: {:.6}", self.fit.objective)?;
        writeln!(f, "Library Version: {}", self.metadata.library_version)?;
        write!(f, "Created: {}", self.metadata.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FitOptions;
    use crate::data::CscMatrix;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fitted_model() -> (CDN, CscMatrix) {
        let x = CscMatrix::from_dense(&[
            vec![1.0, 0.0, 0.5],
            vec![0.0, 1.0, 0.0],
            vec![1.0, 1.0, 0.0],
            vec![-1.0, 0.0, 0.5],
        ])
        .unwrap();
        let y = [1.0, 1.0, 1.0, -1.0];

        let mut model = CDN::new(2.0, -5.0, 5.0, true).unwrap();
        model.fit(&x, &y, &FitOptions::default()).unwrap();
        (model, x)
    }

    #[test]
    fn test_unfitted_model_cannot_be_saved() {
        let model = CDN::new(1.0, -1.0, 1.0, false).unwrap();
        assert!(matches!(
            SerializableModel::from_model(&model),
            Err(CdnError::NotFitted)
        ));
    }

    #[test]
    fn test_model_round_trip() -> Result<()> {
        let (model, x) = fitted_model();
        let serializable = SerializableModel::from_model(&model)?;
        assert_eq!(serializable.metadata.n_features, 3);
        assert_eq!(
            serializable.metadata.library_version,
            env!("CARGO_PKG_VERSION")
        );

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        serializable.save_to_file(temp_file.path())?;

        let loaded = SerializableModel::load_from_file(temp_file.path())?;
        assert_eq!(loaded.config, serializable.config);
        assert_eq!(loaded.fit.weights, serializable.fit.weights);

        let restored = loaded.to_model()?;
        assert_eq!(restored.get_weights()?, model.get_weights()?);
        assert_eq!(
            restored.predict_probabilities(&x)?,
            model.predict_probabilities(&x)?
        );
        Ok(())
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "{{ not a model").unwrap();

        assert!(matches!(
            SerializableModel::load_from_file(temp_file.path()),
            Err(CdnError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SerializableModel::load_from_file("/nonexistent/model.json"),
            Err(CdnError::Io(_))
        ));
    }

    #[test]
    fn test_to_model_checks_consistency() {
        let (model, _) = fitted_model();
        let mut serializable = SerializableModel::from_model(&model).unwrap();
        serializable.metadata.n_features = 7;
        assert!(matches!(
            serializable.to_model(),
            Err(CdnError::DimensionMismatch { .. })
        ));

        let mut serializable = SerializableModel::from_model(&model).unwrap();
        serializable.config.c = -1.0;
        assert!(matches!(
            serializable.to_model(),
            Err(CdnError::InvalidHyperparameter(_))
        ));
    }

    #[test]
    fn test_to_model_rejects_weights_outside_bounds() {
        let (model, _) = fitted_model();
        let mut serializable = SerializableModel::from_model(&model).unwrap();
        serializable.fit.weights[1] = 7.5;
        assert!(matches!(
            serializable.to_model(),
            Err(CdnError::Serialization(_))
        ));

        let mut serializable = SerializableModel::from_model(&model).unwrap();
        serializable.fit.weights[0] = f64::NAN;
        assert!(matches!(
            serializable.to_model(),
            Err(CdnError::Serialization(_))
        ));
    }

    #[test]
    fn test_summary_display() {
        let (model, _) = fitted_model();
        let summary = SerializableModel::from_model(&model).unwrap().to_string();
        assert!(summary.starts_with("=== CDN Model Summary ==="));
        assert!(summary.contains("Features: 3"));
        assert!(summary.contains("C: 2"));
    }
}
