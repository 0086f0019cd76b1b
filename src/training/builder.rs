//! Assembles the unfitted preprocessing + classifier pipeline

use super::config::TrainingConfig;
use super::linear_models::LogisticRegression;
use super::pipeline::ChurnPipeline;
use crate::preprocessing::{ColumnTransformer, PreprocessingConfig};
use polars::prelude::*;
use tracing::info;

/// Build the pipeline for a training frame.
///
/// Numeric and categorical columns are read off `x_train` by dtype; the
/// classifier takes its hyperparameters from `training`.
pub fn build_preprocessing_and_model(
    x_train: &DataFrame,
    target: &str,
    preprocessing: &PreprocessingConfig,
    training: &TrainingConfig,
) -> ChurnPipeline {
    let mut transformer = ColumnTransformer::new(preprocessing.clone());
    transformer.select_columns(x_train);

    info!(numeric = ?transformer.numeric_columns(), "Numeric columns");
    info!(categorical = ?transformer.categorical_columns(), "Categorical columns");
    if !transformer.dropped_columns().is_empty() {
        info!(dropped = ?transformer.dropped_columns(), "Columns left out");
    }

    let classifier = LogisticRegression::new()
        .with_max_iter(training.max_iter)
        .with_tol(training.tol)
        .with_c(training.c)
        .with_class_weight(training.class_weight);

    ChurnPipeline::new(transformer, classifier, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::ClassWeight;

    #[test]
    fn test_builder_routes_columns_and_hyperparameters() {
        let x = df!(
            "tenure" => &[1i64, 20],
            "TotalCharges" => &[29.85, 1889.5],
            "gender" => &["Female", "Male"],
        )
        .unwrap();
        let training = TrainingConfig::default().with_max_iter(50);

        let pipeline = build_preprocessing_and_model(&x, "Churn", &PreprocessingConfig::default(), &training);

        assert!(!pipeline.is_fitted());
        assert_eq!(pipeline.preprocessor().numeric_columns(), &["tenure".to_string(), "TotalCharges".to_string()]);
        assert_eq!(pipeline.preprocessor().categorical_columns(), &["gender".to_string()]);
        assert_eq!(pipeline.classifier().max_iter, 50);
        assert_eq!(pipeline.classifier().class_weight, ClassWeight::Balanced);
        assert_eq!(pipeline.metadata().hyperparameters["class_weight"], "balanced");
    }
}
