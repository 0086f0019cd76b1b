//! Data preprocessing module
//!
//! Column-wise feature preparation for the churn classifier:
//! - Feature scaling of numeric columns (Standard, MinMax)
//! - One-hot encoding of categorical columns, unseen categories ignored
//! - A column transformer that routes each column by dtype and produces a
//!   dense feature matrix

mod config;
mod scaler;
mod encoder;
mod transformer;

pub use config::PreprocessingConfig;
pub use scaler::{Scaler, ScalerType};
pub use encoder::{OneHotEncoder, UnknownCategory};
pub use transformer::ColumnTransformer;

use crate::error::{ChurnError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// How a column is routed through the transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    /// Integer and float columns are numeric, text columns categorical.
    /// Anything else is left out of the feature matrix.
    pub fn from_dtype(dtype: &DataType) -> Option<Self> {
        match dtype {
            DataType::Int32 | DataType::Int64 | DataType::UInt32 | DataType::UInt64 |
            DataType::Float32 | DataType::Float64 => Some(ColumnKind::Numeric),
            DataType::String => Some(ColumnKind::Categorical),
            _ => None,
        }
    }
}

/// Read a numeric column as f64 values. Nulls are rejected.
pub(crate) fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let series = df
        .column(column)
        .map_err(|_| ChurnError::FeatureNotFound(column.to_string()))?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| ChurnError::PreprocessingError(format!("column '{}': {}", column, e)))?;

    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                ChurnError::PreprocessingError(format!(
                    "Missing value in numeric column '{}' at row {}",
                    column, row
                ))
            })
        })
        .collect()
}

/// Read a categorical column as optional strings
pub(crate) fn category_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(column)
        .map_err(|_| ChurnError::FeatureNotFound(column.to_string()))?
        .as_materialized_series()
        .cast(&DataType::String)
        .map_err(|e| ChurnError::PreprocessingError(format!("column '{}': {}", column, e)))?;

    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}
