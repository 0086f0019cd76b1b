//! Feature scaling implementations

use super::numeric_values;
use crate::error::{ChurnError, Result};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Type of scaler to use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalerType {
    /// Standard scaling (z-score normalization): (x - mean) / std
    Standard,
    /// Min-Max scaling: (x - min) / (max - min)
    MinMax,
    /// No scaling
    None,
}

impl FromStr for ScalerType {
    type Err = ChurnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standard" => Ok(ScalerType::Standard),
            "minmax" => Ok(ScalerType::MinMax),
            "none" => Ok(ScalerType::None),
            other => Err(ChurnError::InvalidParameter {
                name: "scaler".to_string(),
                value: other.to_string(),
                reason: "expected one of standard, minmax, none".to_string(),
            }),
        }
    }
}

/// Parameters for a fitted column
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    center: f64,    // mean or min
    scale: f64,     // std or range
}

/// Feature scaler over a fixed, ordered set of numeric columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    scaler_type: ScalerType,
    params: Vec<(String, ScalerParams)>,
    is_fitted: bool,
}

impl Scaler {
    /// Create a new scaler
    pub fn new(scaler_type: ScalerType) -> Self {
        Self {
            scaler_type,
            params: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit the scaler to the given columns of the data
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        self.params = columns
            .iter()
            .map(|col_name| {
                let values = numeric_values(df, col_name)?;
                Ok((col_name.clone(), self.compute_params(&values)))
            })
            .collect::<Result<Vec<_>>>()?;

        self.is_fitted = true;
        Ok(self)
    }

    /// Scale the fitted columns into an (n_rows, n_columns) block
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ChurnError::ModelNotFitted);
        }

        let mut out = Array2::zeros((df.height(), self.params.len()));
        for (j, (col_name, params)) in self.params.iter().enumerate() {
            let values = numeric_values(df, col_name)?;
            for (i, v) in values.into_iter().enumerate() {
                out[[i, j]] = (v - params.center) / params.scale;
            }
        }

        Ok(out)
    }

    /// Names of the fitted columns, in output order
    pub fn columns(&self) -> Vec<String> {
        self.params.iter().map(|(name, _)| name.clone()).collect()
    }

    fn compute_params(&self, values: &[f64]) -> ScalerParams {
        let n = values.len();
        match self.scaler_type {
            ScalerType::Standard => {
                if n == 0 {
                    return ScalerParams { center: 0.0, scale: 1.0 };
                }
                let mean = values.iter().sum::<f64>() / n as f64;
                // Population standard deviation
                let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
                let std = var.sqrt();
                ScalerParams {
                    center: mean,
                    scale: if std == 0.0 { 1.0 } else { std },
                }
            }
            ScalerType::MinMax => {
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if n == 0 {
                    return ScalerParams { center: 0.0, scale: 1.0 };
                }
                let range = max - min;
                ScalerParams {
                    center: min,
                    scale: if range == 0.0 { 1.0 } else { range },
                }
            }
            ScalerType::None => ScalerParams {
                center: 0.0,
                scale: 1.0,
            },
        }
    }
}
