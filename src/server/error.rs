//! Error types for the server

use crate::error::ChurnError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Body could not be parsed into the expected schema
    #[error("Invalid request body: {0}")]
    Rejected(#[from] JsonRejection),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ChurnError> for ServerError {
    fn from(err: ChurnError) -> Self {
        match err {
            ChurnError::ModelNotFound(path) => {
                ServerError::ModelUnavailable(format!("no trained model at {}", path))
            }
            ChurnError::PreprocessingError(_)
            | ChurnError::FeatureNotFound(_)
            | ChurnError::InvalidInput(_)
            | ChurnError::DataError(_)
            | ChurnError::ShapeError { .. } => ServerError::BadRequest(err.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Rejected(rejection) => (rejection.status(), rejection.body_text()),
            ServerError::ModelUnavailable(msg) => {
                tracing::warn!(detail = %msg, "Prediction requested without a model");
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred".to_string())
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
