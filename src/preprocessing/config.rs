//! Preprocessing configuration

use serde::{Deserialize, Serialize};
use super::{ScalerType, UnknownCategory};

/// Configuration for the column transformer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Type of scaler to use for numeric features
    pub scaler_type: ScalerType,

    /// What the one-hot encoder does with categories it never saw in fit
    pub handle_unknown: UnknownCategory,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            scaler_type: ScalerType::Standard,
            handle_unknown: UnknownCategory::Ignore,
        }
    }
}

impl PreprocessingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set scaler type
    pub fn with_scaler(mut self, scaler_type: ScalerType) -> Self {
        self.scaler_type = scaler_type;
        self
    }

    /// Builder method to set the unknown-category policy
    pub fn with_handle_unknown(mut self, policy: UnknownCategory) -> Self {
        self.handle_unknown = policy;
        self
    }
}
