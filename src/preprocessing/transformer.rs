//! Column transformer: dtype-based routing of columns to scaler or encoder

use crate::error::{ChurnError, Result};
use super::{
    config::PreprocessingConfig,
    encoder::OneHotEncoder,
    scaler::Scaler,
    ColumnKind,
};
use ndarray::{concatenate, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Scales numeric columns and one-hot encodes categorical columns.
///
/// Output layout is the numeric block followed by one indicator block per
/// categorical column, all in the order the columns appeared when fitted.
/// Columns of any other dtype are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    config: PreprocessingConfig,
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    dropped_columns: Vec<String>,
    scaler: Option<Scaler>,
    encoder: Option<OneHotEncoder>,
    is_fitted: bool,
    /// Timing: seconds spent in last fit call
    fit_time: Option<f64>,
}

impl ColumnTransformer {
    /// Create an unfitted transformer with the given configuration
    pub fn new(config: PreprocessingConfig) -> Self {
        Self {
            config,
            numeric_columns: Vec::new(),
            categorical_columns: Vec::new(),
            dropped_columns: Vec::new(),
            scaler: None,
            encoder: None,
            is_fitted: false,
            fit_time: None,
        }
    }

    /// Route every column of `df` by dtype. Does not fit anything.
    pub fn select_columns(&mut self, df: &DataFrame) -> &mut Self {
        self.numeric_columns.clear();
        self.categorical_columns.clear();
        self.dropped_columns.clear();

        for col in df.get_columns() {
            let name = col.name().to_string();
            match ColumnKind::from_dtype(col.dtype()) {
                Some(ColumnKind::Numeric) => self.numeric_columns.push(name),
                Some(ColumnKind::Categorical) => self.categorical_columns.push(name),
                None => self.dropped_columns.push(name),
            }
        }

        self
    }

    /// Fit scaler and encoder. Columns are selected from `df` unless
    /// [`select_columns`](Self::select_columns) already ran.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let start = Instant::now();

        if self.numeric_columns.is_empty() && self.categorical_columns.is_empty() {
            self.select_columns(df);
        }

        if self.numeric_columns.is_empty() && self.categorical_columns.is_empty() {
            return Err(ChurnError::PreprocessingError(
                "No numeric or categorical columns to transform".to_string(),
            ));
        }

        self.scaler = if self.numeric_columns.is_empty() {
            None
        } else {
            let mut scaler = Scaler::new(self.config.scaler_type.clone());
            scaler.fit(df, &self.numeric_columns)?;
            Some(scaler)
        };

        self.encoder = if self.categorical_columns.is_empty() {
            None
        } else {
            let mut encoder = OneHotEncoder::new(self.config.handle_unknown);
            encoder.fit(df, &self.categorical_columns)?;
            Some(encoder)
        };

        self.is_fitted = true;
        self.fit_time = Some(start.elapsed().as_secs_f64());

        debug!(
            numeric = self.numeric_columns.len(),
            categorical = self.categorical_columns.len(),
            dropped = ?self.dropped_columns,
            n_features_out = self.n_features_out(),
            "Fitted column transformer"
        );

        Ok(self)
    }

    /// Transform a frame into the dense feature matrix
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ChurnError::ModelNotFitted);
        }

        let blocks: Vec<Array2<f64>> = [
            self.scaler.as_ref().map(|s| s.transform(df)),
            self.encoder.as_ref().map(|e| e.transform(df)),
        ]
        .into_iter()
        .flatten()
        .collect::<Result<Vec<_>>>()?;

        let views: Vec<_> = blocks.iter().map(|b| b.view()).collect();
        Ok(concatenate(Axis(1), &views)?)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Names of the output features, in matrix column order
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.scaler.as_ref().map(|s| s.columns()).unwrap_or_default();
        if let Some(encoder) = &self.encoder {
            names.extend(encoder.feature_names());
        }
        names
    }

    /// Width of the transformed matrix
    pub fn n_features_out(&self) -> usize {
        self.scaler.as_ref().map(|s| s.columns().len()).unwrap_or(0)
            + self.encoder.as_ref().map(|e| e.n_features_out()).unwrap_or(0)
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    pub fn dropped_columns(&self) -> &[String] {
        &self.dropped_columns
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Seconds spent in the last fit call
    pub fn fit_time(&self) -> Option<f64> {
        self.fit_time
    }
}
