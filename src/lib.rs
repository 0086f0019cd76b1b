//! Churn predictor - customer churn prediction for a telecom dataset
//!
//! This crate covers the whole workflow:
//! - Data preparation: load the raw CSV, clean it, stratified split
//! - Model building and training: column transformer + logistic regression
//! - Serving: HTTP endpoint scoring one customer at a time
//! - Client: read a customer JSON file and call the endpoint
//!
//! # Modules
//!
//! - [`data`] - Loading, cleaning and splitting the raw table
//! - [`preprocessing`] - Scaling and one-hot encoding by column type
//! - [`training`] - Logistic regression, metrics, persisted pipeline
//! - [`inference`] - Per-customer scoring and risk tiers
//! - [`server`] - HTTP server with REST API
//! - [`client`] - HTTP client for the scoring endpoint
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// ML workflow
pub mod data;
pub mod preprocessing;
pub mod training;
pub mod inference;

// Services
pub mod server;
pub mod client;
pub mod cli;

pub use error::{ChurnError, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{ChurnError, Result};
    pub use crate::data::{get_train_test_data, DataConfig, TrainTestSplit};
    pub use crate::preprocessing::{ColumnTransformer, PreprocessingConfig};
    pub use crate::training::{
        build_preprocessing_and_model, ChurnPipeline, ClassificationReport, Trainer,
        TrainingConfig,
    };
    pub use crate::inference::{ChurnPrediction, CustomerFeatures, InferenceEngine, RiskLevel};
}
