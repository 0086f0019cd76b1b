//! Categorical one-hot encoding

use super::category_values;
use crate::error::{ChurnError, Result};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Policy for categories not seen during fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownCategory {
    /// Encode as an all-zero block
    Ignore,
    /// Fail the transform
    Error,
}

/// One-hot encoder over a fixed, ordered set of categorical columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    handle_unknown: UnknownCategory,
    // Column name -> sorted categories seen in fit
    categories: Vec<(String, Vec<String>)>,
    is_fitted: bool,
}

impl OneHotEncoder {
    /// Create a new encoder
    pub fn new(handle_unknown: UnknownCategory) -> Self {
        Self {
            handle_unknown,
            categories: Vec::new(),
            is_fitted: false,
        }
    }

    /// Learn the categories of each column
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        self.categories = columns
            .iter()
            .map(|col_name| {
                let seen: BTreeSet<String> = category_values(df, col_name)?
                    .into_iter()
                    .flatten()
                    .collect();
                Ok((col_name.clone(), seen.into_iter().collect()))
            })
            .collect::<Result<Vec<_>>>()?;

        self.is_fitted = true;
        Ok(self)
    }

    /// Encode the fitted columns into an (n_rows, n_features_out) 0/1 block.
    /// Missing values are treated like unseen categories.
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ChurnError::ModelNotFitted);
        }

        let mut out = Array2::zeros((df.height(), self.n_features_out()));
        let mut offset = 0;

        for (col_name, categories) in &self.categories {
            let values = category_values(df, col_name)?;

            for (row, value) in values.iter().enumerate() {
                let position = value
                    .as_deref()
                    .and_then(|v| categories.binary_search_by(|c| c.as_str().cmp(v)).ok());

                match (position, self.handle_unknown) {
                    (Some(pos), _) => out[[row, offset + pos]] = 1.0,
                    (None, UnknownCategory::Ignore) => {}
                    (None, UnknownCategory::Error) => {
                        return Err(ChurnError::PreprocessingError(format!(
                            "Found unknown category {:?} in column '{}' during transform",
                            value, col_name
                        )));
                    }
                }
            }

            offset += categories.len();
        }

        Ok(out)
    }

    /// Total number of output indicator columns
    pub fn n_features_out(&self) -> usize {
        self.categories.iter().map(|(_, cats)| cats.len()).sum()
    }

    /// Output column names as `<column>_<category>`
    pub fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|(col, cats)| cats.iter().map(move |c| format!("{}_{}", col, c)))
            .collect()
    }

    /// Sorted categories learned for a column
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cats)| cats.as_slice())
    }
}
