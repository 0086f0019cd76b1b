//! Inference module
//!
//! Turns one customer record into a churn probability, a 0/1 prediction and
//! a risk tier, using the pipeline persisted by training.

mod engine;
mod features;

pub use engine::{
    ChurnPrediction, InferenceEngine, ModelHandle, RiskLevel, HIGH_RISK_THRESHOLD,
    MEDIUM_RISK_THRESHOLD,
};
pub use features::CustomerFeatures;

#[cfg(test)]
pub(crate) use features::example_customer;
