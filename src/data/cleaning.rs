//! Cleaning of the raw churn table

use super::config::DataConfig;
use crate::error::{ChurnError, Result};
use crate::preprocessing::ColumnKind;
use polars::prelude::*;
use tracing::info;

/// Apply the basic cleaning steps to the raw frame:
///
/// - coerce the text-typed numeric column to Float64 (unparseable values become null)
/// - drop rows where that column is null
/// - drop the identifier column when present
/// - map the label column to 0/1
pub fn clean_data(df: &DataFrame, config: &DataConfig) -> Result<DataFrame> {
    let mut data = df.clone();

    let raw = data
        .column(&config.numeric_coerce_column)
        .map_err(|_| ChurnError::FeatureNotFound(config.numeric_coerce_column.clone()))?;
    let coerced = coerce_to_f64(raw.as_materialized_series())?;
    data.with_column(coerced)?;

    let before = data.height();
    let mask = data
        .column(&config.numeric_coerce_column)?
        .as_materialized_series()
        .is_not_null();
    data = data.filter(&mask)?;
    let dropped = before - data.height();
    if dropped > 0 {
        info!(
            column = %config.numeric_coerce_column,
            dropped,
            remaining = data.height(),
            "Dropped rows with missing values"
        );
    }

    if data.column(&config.id_column).is_ok() {
        data = data.drop(&config.id_column)?;
    }

    let target = data.column(&config.target_column).map_err(|_| {
        ChurnError::DataError(format!(
            "The column '{}' is not present in the data.",
            config.target_column
        ))
    })?;
    let labels = encode_labels(target.as_materialized_series(), config)?;
    data.with_column(labels)?;

    Ok(data)
}

/// Convert a column to Float64, turning anything that does not parse into null
pub fn coerce_to_f64(series: &Series) -> Result<Series> {
    let name = series.name().clone();

    match series.dtype() {
        DataType::String => {
            let values: Float64Chunked = series
                .str()?
                .into_iter()
                .map(|v| v.and_then(|s| s.trim().parse::<f64>().ok()))
                .collect();
            Ok(values.with_name(name).into_series())
        }
        dtype if ColumnKind::from_dtype(dtype) == Some(ColumnKind::Numeric) => {
            Ok(series.cast(&DataType::Float64)?)
        }
        other => Err(ChurnError::DataError(format!(
            "Column '{}' has type {:?} and cannot be coerced to a number",
            name, other
        ))),
    }
}

/// Map the label column to Int32 0/1. Already-numeric 0/1 labels pass through.
fn encode_labels(series: &Series, config: &DataConfig) -> Result<Series> {
    let name = series.name().clone();
    let unexpected = |row: usize, value: String| {
        ChurnError::DataError(format!(
            "Unexpected value {} in label column '{}' at row {}",
            value, name, row
        ))
    };

    let labels: Vec<i32> = match series.dtype() {
        DataType::String => series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| match v {
                Some(v) if v == config.positive_label => Ok(1),
                Some(v) if v == config.negative_label => Ok(0),
                other => Err(unexpected(row, format!("{:?}", other))),
            })
            .collect::<Result<Vec<_>>>()?,
        dtype if ColumnKind::from_dtype(dtype) == Some(ColumnKind::Numeric) => {
            let casted = series.cast(&DataType::Float64)?;
            casted
                .f64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| match v {
                    Some(v) if v == 1.0 => Ok(1),
                    Some(v) if v == 0.0 => Ok(0),
                    other => Err(unexpected(row, format!("{:?}", other))),
                })
                .collect::<Result<Vec<_>>>()?
        }
        other => {
            return Err(ChurnError::DataError(format!(
                "Label column '{}' has unsupported type {:?}",
                name, other
            )))
        }
    };

    Ok(Series::new(name.clone(), labels))
}
