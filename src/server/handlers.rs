//! Request handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::inference::{ChurnPrediction, CustomerFeatures};
use crate::training::ModelMetadata;

use super::error::Result;
use super::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Churn prediction API. Send a POST request to /predict_churn with customer data.",
    }))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model_loaded": state.model.is_loaded(),
        "uptime_secs": state.uptime_secs(),
    }))
}

/// Metadata of the served model
pub async fn model_info(State(state): State<Arc<AppState>>) -> Result<Json<ModelMetadata>> {
    let engine = state.model.get().await?;
    Ok(Json(engine.metadata().clone()))
}

pub async fn predict_churn(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CustomerFeatures>, JsonRejection>,
) -> Result<Json<ChurnPrediction>> {
    let Json(customer) = payload?;
    let engine = state.model.get().await?;
    let prediction = engine.predict(&customer)?;

    info!(
        probability = prediction.churn_probability,
        prediction = prediction.churn_prediction,
        risk = %prediction.risk_label,
        "Churn prediction served"
    );

    Ok(Json(prediction))
}
