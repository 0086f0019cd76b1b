//! Fitted preprocessing + classifier pipeline and its on-disk format

use super::linear_models::LogisticRegression;
use super::metrics::EvaluationSummary;
use crate::error::{ChurnError, Result};
use crate::preprocessing::ColumnTransformer;
use chrono::Utc;
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Descriptive data stored next to the fitted parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    /// Crate version that produced the artifact
    pub version: String,
    /// RFC 3339 timestamp of the last fit
    pub trained_at: Option<String>,
    pub target: String,
    /// Raw input columns, as seen by the transformer
    pub input_columns: Vec<String>,
    /// Transformed feature names, aligned with the coefficients
    pub feature_names: Vec<String>,
    pub n_train_samples: usize,
    pub training_time_secs: f64,
    pub hyperparameters: BTreeMap<String, String>,
    pub metrics: BTreeMap<String, f64>,
}

impl ModelMetadata {
    fn new(target: &str, classifier: &LogisticRegression) -> Self {
        let mut hyperparameters = BTreeMap::new();
        hyperparameters.insert("c".to_string(), classifier.c.to_string());
        hyperparameters.insert("max_iter".to_string(), classifier.max_iter.to_string());
        hyperparameters.insert("tol".to_string(), classifier.tol.to_string());
        hyperparameters.insert(
            "class_weight".to_string(),
            format!("{:?}", classifier.class_weight).to_lowercase(),
        );

        Self {
            name: "churn_logistic_regression".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            trained_at: None,
            target: target.to_string(),
            input_columns: Vec::new(),
            feature_names: Vec::new(),
            n_train_samples: 0,
            training_time_secs: 0.0,
            hyperparameters,
            metrics: BTreeMap::new(),
        }
    }
}

/// Column transformer followed by a logistic regression classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnPipeline {
    metadata: ModelMetadata,
    preprocessor: ColumnTransformer,
    classifier: LogisticRegression,
}

impl ChurnPipeline {
    /// Assemble an unfitted pipeline
    pub fn new(preprocessor: ColumnTransformer, classifier: LogisticRegression, target: &str) -> Self {
        Self {
            metadata: ModelMetadata::new(target, &classifier),
            preprocessor,
            classifier,
        }
    }

    /// Fit the transformer and then the classifier on the transformed frame
    pub fn fit(&mut self, x: &DataFrame, y: &Array1<f64>) -> Result<&mut Self> {
        let start = Instant::now();

        let features = self.preprocessor.fit_transform(x)?;
        self.classifier.fit(&features, y)?;

        self.metadata.trained_at = Some(Utc::now().to_rfc3339());
        self.metadata.input_columns = self
            .preprocessor
            .numeric_columns()
            .iter()
            .chain(self.preprocessor.categorical_columns())
            .cloned()
            .collect();
        self.metadata.feature_names = self.preprocessor.feature_names();
        self.metadata.n_train_samples = x.height();
        self.metadata.training_time_secs = start.elapsed().as_secs_f64();

        info!(
            samples = x.height(),
            features = features.ncols(),
            iterations = self.classifier.n_iter,
            secs = self.metadata.training_time_secs,
            "Pipeline fitted"
        );

        Ok(self)
    }

    /// Probability of churn for each row
    pub fn predict_proba(&self, x: &DataFrame) -> Result<Array1<f64>> {
        let features = self.preprocessor.transform(x)?;
        self.classifier.predict_proba(&features)
    }

    /// Churn label (0/1) for each row
    pub fn predict(&self, x: &DataFrame) -> Result<Array1<f64>> {
        let features = self.preprocessor.transform(x)?;
        self.classifier.predict(&features)
    }

    /// Score a labelled frame
    pub fn evaluate(&self, x: &DataFrame, y: &Array1<f64>) -> Result<EvaluationSummary> {
        let features = self.preprocessor.transform(x)?;
        let proba = self.classifier.predict_proba(&features)?;
        let labels = proba.mapv(|p| if p > 0.5 { 1.0 } else { 0.0 });
        EvaluationSummary::compute(y, &labels, &proba)
    }

    /// Store evaluation results in the metadata
    pub fn record_evaluation(&mut self, evaluation: &EvaluationSummary) {
        self.metadata.metrics.extend(evaluation.as_metrics());
    }

    /// The `k` coefficients with the largest magnitude, by feature name
    pub fn top_coefficients(&self, k: usize) -> Vec<(String, f64)> {
        let Some(coefficients) = &self.classifier.coefficients else {
            return Vec::new();
        };

        let mut pairs: Vec<(String, f64)> = self
            .metadata
            .feature_names
            .iter()
            .cloned()
            .zip(coefficients.iter().copied())
            .collect();
        pairs.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        pairs.truncate(k);
        pairs
    }

    pub fn is_fitted(&self) -> bool {
        self.preprocessor.is_fitted() && self.classifier.is_fitted
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn preprocessor(&self) -> &ColumnTransformer {
        &self.preprocessor
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    /// Write the pipeline as JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if !self.is_fitted() {
            return Err(ChurnError::ModelNotFitted);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "Saved pipeline");
        Ok(())
    }

    /// Read a pipeline written by [`save`](Self::save)
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ChurnError::ModelNotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path)?;
        let pipeline: Self = serde_json::from_str(&json)?;
        if !pipeline.is_fitted() {
            return Err(ChurnError::InferenceError(format!(
                "model at {} was saved unfitted",
                path.display()
            )));
        }
        debug!(path = %path.display(), "Loaded pipeline");
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::PreprocessingConfig;
    use ndarray::array;
    use tempfile::tempdir;

    fn sample() -> (DataFrame, Array1<f64>) {
        let x = df!(
            "tenure" => &[1i64, 2, 3, 40, 50, 60, 4, 45],
            "Contract" => &[
                "Month-to-month", "Month-to-month", "Month-to-month", "Two year",
                "Two year", "One year", "Month-to-month", "Two year",
            ],
        )
        .unwrap();
        let y = array![1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        (x, y)
    }

    fn pipeline() -> ChurnPipeline {
        ChurnPipeline::new(
            ColumnTransformer::new(PreprocessingConfig::default()),
            LogisticRegression::new(),
            "Churn",
        )
    }

    #[test]
    fn test_fit_and_predict() {
        let (x, y) = sample();
        let mut pipeline = pipeline();
        pipeline.fit(&x, &y).unwrap();

        assert!(pipeline.is_fitted());
        let proba = pipeline.predict_proba(&x).unwrap();
        assert_eq!(proba.len(), 8);
        assert!(proba[0] > proba[4]);

        let meta = pipeline.metadata();
        assert_eq!(meta.n_train_samples, 8);
        assert_eq!(meta.input_columns, vec!["tenure", "Contract"]);
        assert_eq!(meta.feature_names.len(), 4);
        assert!(meta.trained_at.is_some());
    }

    #[test]
    fn test_save_load_preserves_predictions() {
        let (x, y) = sample();
        let mut fitted = pipeline();
        fitted.fit(&x, &y).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");
        fitted.save(&path).unwrap();

        let loaded = ChurnPipeline::load(&path).unwrap();
        assert_eq!(
            fitted.predict_proba(&x).unwrap(),
            loaded.predict_proba(&x).unwrap()
        );
        assert_eq!(loaded.metadata().target, "Churn");
    }

    #[test]
    fn test_load_missing_model() {
        let dir = tempdir().unwrap();
        let err = ChurnPipeline::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ChurnError::ModelNotFound(_)));
    }

    #[test]
    fn test_save_unfitted() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            pipeline().save(&dir.path().join("m.json")),
            Err(ChurnError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_top_coefficients() {
        let (x, y) = sample();
        let mut fitted = pipeline();
        fitted.fit(&x, &y).unwrap();

        let top = fitted.top_coefficients(2);
        assert_eq!(top.len(), 2);
        assert!(top[0].1.abs() >= top[1].1.abs());
        assert!(pipeline().top_coefficients(3).is_empty());
    }

    #[test]
    fn test_record_evaluation() {
        let (x, y) = sample();
        let mut fitted = pipeline();
        fitted.fit(&x, &y).unwrap();
        let summary = fitted.evaluate(&x, &y).unwrap();
        fitted.record_evaluation(&summary);
        assert!(fitted.metadata().metrics.contains_key("roc_auc"));
    }
}
