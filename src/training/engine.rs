//! End-to-end training: prepare data, build, fit, evaluate, persist

use super::builder::build_preprocessing_and_model;
use super::config::TrainingConfig;
use super::metrics::{ClassificationReport, EvaluationSummary};
use super::pipeline::ChurnPipeline;
use crate::data::{get_train_test_data, DataConfig, TrainTestSplit};
use crate::error::Result;
use crate::preprocessing::PreprocessingConfig;
use std::path::PathBuf;
use tracing::info;

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub pipeline: ChurnPipeline,
    pub evaluation: EvaluationSummary,
    pub model_path: PathBuf,
}

impl TrainingOutcome {
    /// ROC AUC on the test split
    pub fn auc(&self) -> f64 {
        self.evaluation.auc
    }

    pub fn report(&self) -> &ClassificationReport {
        &self.evaluation.report
    }
}

/// Runs the training workflow with fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    pub data: DataConfig,
    pub preprocessing: PreprocessingConfig,
    pub training: TrainingConfig,
}

impl Trainer {
    pub fn new(data: DataConfig, preprocessing: PreprocessingConfig, training: TrainingConfig) -> Self {
        Self {
            data,
            preprocessing,
            training,
        }
    }

    /// Load and split the raw CSV, then train on the split
    pub fn train_and_evaluate(&self) -> Result<TrainingOutcome> {
        info!(path = %self.data.csv_path.display(), "Preparing data");
        let split = get_train_test_data(&self.data)?;
        self.train_on_split(&split)
    }

    /// Build, fit, evaluate on the test part and save the pipeline
    pub fn train_on_split(&self, split: &TrainTestSplit) -> Result<TrainingOutcome> {
        let mut pipeline = build_preprocessing_and_model(
            &split.x_train,
            &self.data.target_column,
            &self.preprocessing,
            &self.training,
        );

        info!(rows = split.x_train.height(), "Training model");
        pipeline.fit(&split.x_train, &split.y_train)?;

        let evaluation = pipeline.evaluate(&split.x_test, &split.y_test)?;
        pipeline.record_evaluation(&evaluation);
        info!(auc = evaluation.auc, accuracy = evaluation.report.accuracy, "Evaluated on test split");

        let model_path = self.training.model_path();
        pipeline.save(&model_path)?;
        info!(path = %model_path.display(), "Model saved");

        Ok(TrainingOutcome {
            pipeline,
            evaluation,
            model_path,
        })
    }
}
