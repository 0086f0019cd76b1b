//! Application state management

use crate::inference::ModelHandle;
use chrono::{DateTime, Utc};

use super::ServerConfig;

/// Application state shared across handlers
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub model: ModelHandle,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// State whose model is read from `config.model_path` on first use
    pub fn new(config: ServerConfig) -> Self {
        let model = ModelHandle::new(config.model_path.clone());
        Self::with_model(config, model)
    }

    pub fn with_model(config: ServerConfig, model: ModelHandle) -> Self {
        Self {
            config,
            model,
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        Utc::now().signed_duration_since(self.started_at).num_seconds()
    }
}
