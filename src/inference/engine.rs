//! Scoring of single customers against a persisted pipeline

use super::features::CustomerFeatures;
use crate::error::{ChurnError, Result};
use crate::training::{ChurnPipeline, ModelMetadata};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Probability at or above which a customer is high risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.8;
/// Probability at or above which a customer is medium risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.5;

/// Coarse churn risk tier, sent as `bajo` / `medio` / `alto`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "bajo")]
    Low,
    #[serde(rename = "medio")]
    Medium,
    #[serde(rename = "alto")]
    High,
}

impl RiskLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if probability >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "bajo",
            RiskLevel::Medium => "medio",
            RiskLevel::High => "alto",
        };
        f.write_str(label)
    }
}

/// Response of the scoring endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnPrediction {
    pub churn_probability: f64,
    /// 1 when the probability exceeds 0.5
    pub churn_prediction: u8,
    pub risk_label: RiskLevel,
}

impl ChurnPrediction {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            churn_probability: probability,
            churn_prediction: u8::from(probability > 0.5),
            risk_label: RiskLevel::from_probability(probability),
        }
    }
}

/// Scores customers with a fitted pipeline
#[derive(Debug)]
pub struct InferenceEngine {
    pipeline: ChurnPipeline,
}

impl InferenceEngine {
    pub fn new(pipeline: ChurnPipeline) -> Result<Self> {
        if !pipeline.is_fitted() {
            return Err(ChurnError::ModelNotFitted);
        }
        Ok(Self { pipeline })
    }

    /// Load the pipeline from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::new(ChurnPipeline::load(path)?)
    }

    /// Score one customer
    pub fn predict(&self, customer: &CustomerFeatures) -> Result<ChurnPrediction> {
        let start = Instant::now();
        let frame = customer.to_dataframe()?;
        let probability = self
            .pipeline
            .predict_proba(&frame)?
            .first()
            .copied()
            .ok_or_else(|| ChurnError::InferenceError("model returned no prediction".to_string()))?;

        let prediction = ChurnPrediction::from_probability(probability);
        debug!(
            probability,
            risk = %prediction.risk_label,
            latency_us = start.elapsed().as_micros() as u64,
            "Scored customer"
        );
        Ok(prediction)
    }

    pub fn metadata(&self) -> &ModelMetadata {
        self.pipeline.metadata()
    }
}

/// Pipeline loaded from disk on first use and shared afterwards.
///
/// A failed load leaves the handle empty so the next call tries again.
#[derive(Debug)]
pub struct ModelHandle {
    path: PathBuf,
    engine: OnceCell<Arc<InferenceEngine>>,
}

impl ModelHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            engine: OnceCell::new(),
        }
    }

    /// Handle that is already loaded
    pub fn with_engine(path: impl Into<PathBuf>, engine: InferenceEngine) -> Self {
        Self {
            path: path.into(),
            engine: OnceCell::new_with(Some(Arc::new(engine))),
        }
    }

    /// Loaded engine, reading the model file if this is the first call
    pub async fn get(&self) -> Result<Arc<InferenceEngine>> {
        self.engine
            .get_or_try_init(|| async {
                let path = self.path.clone();
                let engine = tokio::task::spawn_blocking(move || InferenceEngine::from_path(&path))
                    .await
                    .map_err(|e| ChurnError::InferenceError(format!("model loading task failed: {}", e)))??;
                info!(
                    path = %self.path.display(),
                    trained_at = engine.metadata().trained_at.as_deref().unwrap_or("unknown"),
                    "Model loaded"
                );
                Ok::<_, ChurnError>(Arc::new(engine))
            })
            .await
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.initialized()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
