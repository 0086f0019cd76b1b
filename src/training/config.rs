//! Training configuration

use super::linear_models::ClassWeight;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory used for trained models when `MODELS_DIR` is unset
pub const DEFAULT_MODELS_DIR: &str = "models";

/// File name of the persisted pipeline inside the models directory
pub const DEFAULT_MODEL_FILE: &str = "churn_model.json";

/// Hyperparameters of the classifier plus where the fitted pipeline goes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Maximum solver iterations
    pub max_iter: usize,
    /// Solver tolerance
    pub tol: f64,
    /// Inverse L2 regularization strength
    pub c: f64,
    pub class_weight: ClassWeight,
    pub models_dir: PathBuf,
    pub model_file_name: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tol: 1e-6,
            c: 1.0,
            class_weight: ClassWeight::Balanced,
            models_dir: std::env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODELS_DIR)),
            model_file_name: DEFAULT_MODEL_FILE.to_string(),
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn with_class_weight(mut self, class_weight: ClassWeight) -> Self {
        self.class_weight = class_weight;
        self
    }

    pub fn with_models_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.models_dir = dir.into();
        self
    }

    /// Full path of the persisted model
    pub fn model_path(&self) -> PathBuf {
        self.models_dir.join(&self.model_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.max_iter, 1000);
        assert_eq!(config.c, 1.0);
        assert_eq!(config.class_weight, ClassWeight::Balanced);
        assert_eq!(config.model_file_name, "churn_model.json");
    }

    #[test]
    fn test_model_path() {
        let config = TrainingConfig::new().with_models_dir("/tmp/churn-models");
        assert_eq!(
            config.model_path(),
            PathBuf::from("/tmp/churn-models/churn_model.json")
        );
    }
}
