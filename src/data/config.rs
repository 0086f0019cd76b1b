//! Data preparation configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the raw dataset, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "data/raw/WA_Fn-UseC_-Telco-Customer-Churn.csv";

/// Configuration for loading, cleaning and partitioning the raw dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Raw CSV file
    pub csv_path: PathBuf,

    /// Column stored as text in the raw file that must be coerced to a number
    pub numeric_coerce_column: String,

    /// Identifier column, dropped before training
    pub id_column: String,

    /// Binary label column
    pub target_column: String,

    /// Raw label value mapped to 1
    pub positive_label: String,

    /// Raw label value mapped to 0
    pub negative_label: String,

    /// Fraction of rows held out for evaluation
    pub test_size: f64,

    /// Seed for the stratified shuffle
    pub random_state: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: std::env::var("CHURN_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH)),
            numeric_coerce_column: "TotalCharges".to_string(),
            id_column: "customerID".to_string(),
            target_column: "Churn".to_string(),
            positive_label: "Yes".to_string(),
            negative_label: "No".to_string(),
            test_size: 0.2,
            random_state: 42,
        }
    }
}

impl DataConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the raw CSV path
    pub fn with_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = path.into();
        self
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Builder method to set the shuffle seed
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Builder method to set the label column and its raw values
    pub fn with_target(
        mut self,
        column: impl Into<String>,
        positive: impl Into<String>,
        negative: impl Into<String>,
    ) -> Self {
        self.target_column = column.into();
        self.positive_label = positive.into();
        self.negative_label = negative.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DataConfig::default();
        assert_eq!(config.target_column, "Churn");
        assert_eq!(config.numeric_coerce_column, "TotalCharges");
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.random_state, 42);
    }

    #[test]
    fn test_builder_pattern() {
        let config = DataConfig::new()
            .with_csv_path("/tmp/churn.csv")
            .with_test_size(0.3)
            .with_random_state(7)
            .with_target("Exited", "1", "0");

        assert_eq!(config.csv_path, PathBuf::from("/tmp/churn.csv"));
        assert_eq!(config.test_size, 0.3);
        assert_eq!(config.random_state, 7);
        assert_eq!(config.target_column, "Exited");
        assert_eq!(config.positive_label, "1");
    }
}
