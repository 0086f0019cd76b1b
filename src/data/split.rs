//! Feature/target separation and stratified train/test partitioning

use crate::error::{ChurnError, Result};
use ndarray::Array1;
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Train and test partitions of a cleaned dataset
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: DataFrame,
    pub x_test: DataFrame,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

impl TrainTestSplit {
    /// (rows, columns) of the training features
    pub fn train_shape(&self) -> (usize, usize) {
        self.x_train.shape()
    }

    /// (rows, columns) of the test features
    pub fn test_shape(&self) -> (usize, usize) {
        self.x_test.shape()
    }
}

/// Separate the cleaned frame into the feature frame and the label vector
pub fn split_features_target(data: &DataFrame, target_column: &str) -> Result<(DataFrame, Array1<f64>)> {
    let target = data
        .column(target_column)
        .map_err(|_| ChurnError::FeatureNotFound(target_column.to_string()))?;
    let casted = target.as_materialized_series().cast(&DataType::Float64)?;

    let y = casted
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                ChurnError::DataError(format!("Missing label in '{}' at row {}", target_column, row))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    let x = data.drop(target_column)?;
    Ok((x, Array1::from(y)))
}

/// Split rows into train/test keeping the class proportions of `y`.
///
/// `ceil(test_size * n)` rows go to the test side, shared between classes by
/// largest remainder. Every class keeps at least one row on each side.
pub fn stratified_split(
    x: &DataFrame,
    y: &Array1<f64>,
    test_size: f64,
    random_state: u64,
) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ChurnError::InvalidParameter {
            name: "test_size".to_string(),
            value: test_size.to_string(),
            reason: "must be strictly between 0 and 1".to_string(),
        });
    }

    if x.height() != y.len() {
        return Err(ChurnError::ShapeError {
            expected: format!("y length = {}", x.height()),
            actual: format!("y length = {}", y.len()),
        });
    }

    let (train_indices, test_indices) = stratified_indices(y, test_size, random_state)?;

    Ok(TrainTestSplit {
        x_train: take_rows(x, &train_indices)?,
        x_test: take_rows(x, &test_indices)?,
        y_train: train_indices.iter().map(|&i| y[i]).collect(),
        y_test: test_indices.iter().map(|&i| y[i]).collect(),
    })
}

fn stratified_indices(
    y: &Array1<f64>,
    test_size: f64,
    random_state: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let n = y.len();

    let mut class_indices: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, &label) in y.iter().enumerate() {
        class_indices.entry(label.round() as i64).or_default().push(i);
    }

    if class_indices.len() < 2 {
        return Err(ChurnError::DataError(
            "Stratified split needs at least two classes".to_string(),
        ));
    }

    if let Some((class, _)) = class_indices.iter().find(|(_, idx)| idx.len() < 2) {
        return Err(ChurnError::DataError(format!(
            "The least populated class ({}) has only 1 member, which is too few",
            class
        )));
    }

    let n_classes = class_indices.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n - n_test;
    if n_test < n_classes || n_train < n_classes {
        return Err(ChurnError::DataError(format!(
            "test_size={} gives {} test and {} train rows, both must be >= number of classes ({})",
            test_size, n_test, n_train, n_classes
        )));
    }

    // Largest-remainder allocation of the test rows between classes
    let mut allocation: Vec<(usize, f64)> = class_indices
        .values()
        .map(|idx| {
            let exact = n_test as f64 * idx.len() as f64 / n as f64;
            (exact.floor() as usize, exact - exact.floor())
        })
        .collect();
    let assigned: usize = allocation.iter().map(|(count, _)| count).sum();
    let mut order: Vec<usize> = (0..allocation.len()).collect();
    order.sort_by(|&a, &b| {
        allocation[b]
            .1
            .partial_cmp(&allocation[a].1)
            .unwrap_or(Ordering::Equal)
    });
    for &i in order.iter().take(n_test.saturating_sub(assigned)) {
        allocation[i].0 += 1;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(random_state);
    let mut train_indices = Vec::with_capacity(n_train);
    let mut test_indices = Vec::with_capacity(n_test);

    for (indices, (count, _)) in class_indices.into_values().zip(allocation) {
        let mut indices = indices;
        indices.shuffle(&mut rng);
        let count = count.clamp(1, indices.len() - 1);
        test_indices.extend_from_slice(&indices[..count]);
        train_indices.extend_from_slice(&indices[count..]);
    }

    train_indices.shuffle(&mut rng);
    test_indices.shuffle(&mut rng);

    Ok((train_indices, test_indices))
}

fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx: Vec<IdxSize> = indices.iter().map(|&i| i as IdxSize).collect();
    let idx = IdxCa::from_vec("idx".into(), idx);
    Ok(df.take(&idx)?)
}
