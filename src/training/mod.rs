//! Model training module
//!
//! Provides:
//! - L2-regularised logistic regression with class weighting
//! - the preprocessing + classifier pipeline and its JSON artifact
//! - classification report and ROC AUC
//! - the train/evaluate/save workflow

mod builder;
mod config;
mod engine;
mod metrics;
mod pipeline;
pub mod linear_models;

pub use builder::build_preprocessing_and_model;
pub use config::{TrainingConfig, DEFAULT_MODELS_DIR, DEFAULT_MODEL_FILE};
pub use engine::{Trainer, TrainingOutcome};
pub use linear_models::{ClassWeight, LogisticRegression};
pub use metrics::{roc_auc_score, ClassMetrics, ClassificationReport, EvaluationSummary};
pub use pipeline::{ChurnPipeline, ModelMetadata};
