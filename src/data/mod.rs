//! Data preparation module
//!
//! Loads the raw churn table, cleans it and produces a stratified
//! train/test partition:
//! - text-typed charges column coerced to numbers, incomplete rows dropped
//! - identifier column removed
//! - binary label mapped to 0/1

mod config;
mod loader;
mod cleaning;
mod split;

pub use config::{DataConfig, DEFAULT_DATA_PATH};
pub use loader::load_raw_data;
pub use cleaning::{clean_data, coerce_to_f64};
pub use split::{split_features_target, stratified_split, TrainTestSplit};

use crate::error::Result;
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Full preparation pipeline for training and evaluation:
///
/// 1. load the raw CSV
/// 2. clean it
/// 3. separate features and label
/// 4. stratified train/test split
pub fn get_train_test_data(config: &DataConfig) -> Result<TrainTestSplit> {
    let raw = load_raw_data(&config.csv_path)?;
    let cleaned = clean_data(&raw, config)?;
    let (x, y) = split_features_target(&cleaned, &config.target_column)?;
    let split = stratified_split(&x, &y, config.test_size, config.random_state)?;

    info!(
        raw_rows = raw.height(),
        clean_rows = cleaned.height(),
        train_rows = split.x_train.height(),
        test_rows = split.x_test.height(),
        features = split.x_train.width(),
        "Prepared train/test data"
    );

    Ok(split)
}

/// Summary of a feature frame and its labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSummary {
    pub rows: usize,
    pub columns: usize,
    pub positives: usize,
    pub negatives: usize,
    /// (column name, dtype) pairs in frame order
    pub dtypes: Vec<(String, String)>,
}

impl DataSummary {
    /// Summarise a feature frame and its 0/1 labels
    pub fn new(x: &DataFrame, y: &Array1<f64>) -> Self {
        let positives = y.iter().filter(|&&v| v > 0.5).count();
        let dtypes = x
            .get_columns()
            .iter()
            .map(|c| (c.name().to_string(), format!("{:?}", c.dtype())))
            .collect();

        Self {
            rows: x.height(),
            columns: x.width(),
            positives,
            negatives: y.len() - positives,
            dtypes,
        }
    }

    /// Fraction of positive (churned) rows
    pub fn churn_rate(&self) -> f64 {
        let total = self.positives + self.negatives;
        if total == 0 {
            0.0
        } else {
            self.positives as f64 / total as f64
        }
    }
}
