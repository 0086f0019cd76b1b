//! Integration test: Server API endpoints

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use churn_predictor::server::{create_router, AppState, ServerConfig};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

fn test_app(model_path: &Path) -> (axum::Router, Arc<AppState>) {
    let config = ServerConfig::default()
        .with_host("127.0.0.1")
        .with_port(0)
        .with_model_path(model_path);
    let state = Arc::new(AppState::new(config));
    (create_router(Arc::clone(&state)), state)
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_root_points_to_prediction_endpoint() {
    let dir = tempdir().unwrap();
    let (app, _) = test_app(&dir.path().join("missing.json"));

    let (status, body) = send(app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("/predict_churn"));
}

#[tokio::test]
async fn test_health_reports_lazy_model() {
    let dir = tempdir().unwrap();
    let outcome = common::train_model(dir.path());
    let (app, state) = test_app(&outcome.model_path);

    let (status, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_loaded"], false);

    let (status, _) = send(app.clone(), post_json("/predict_churn", &common::customer_json().to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.model.is_loaded());

    let (_, body) = send(app, get("/health")).await;
    assert_eq!(body["model_loaded"], true);
}

#[tokio::test]
async fn test_predict_churn() {
    let dir = tempdir().unwrap();
    let outcome = common::train_model(dir.path());
    let (app, _) = test_app(&outcome.model_path);

    let (status, risky) = send(app.clone(), post_json("/predict_churn", &common::customer_json().to_string())).await;
    assert_eq!(status, StatusCode::OK);
    let p_risky = risky["churn_probability"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&p_risky));
    assert_eq!(risky["churn_prediction"], u8::from(p_risky > 0.5));
    assert!(["bajo", "medio", "alto"].contains(&risky["risk_label"].as_str().unwrap()));

    let (status, loyal) = send(app, post_json("/predict_churn", &common::loyal_customer_json().to_string())).await;
    assert_eq!(status, StatusCode::OK);
    let p_loyal = loyal["churn_probability"].as_f64().unwrap();
    assert!(p_risky > p_loyal, "{} <= {}", p_risky, p_loyal);
    assert_eq!(loyal["risk_label"], "bajo");
}

#[tokio::test]
async fn test_predict_matches_pipeline() {
    let dir = tempdir().unwrap();
    let outcome = common::train_model(dir.path());
    let (app, _) = test_app(&outcome.model_path);

    let customer: churn_predictor::inference::CustomerFeatures =
        serde_json::from_value(common::customer_json()).unwrap();
    let expected = outcome
        .pipeline
        .predict_proba(&customer.to_dataframe().unwrap())
        .unwrap()[0];

    let (_, body) = send(app, post_json("/predict_churn", &common::customer_json().to_string())).await;
    assert!((body["churn_probability"].as_f64().unwrap() - expected).abs() < 1e-12);
}

#[tokio::test]
async fn test_missing_field_is_unprocessable() {
    let dir = tempdir().unwrap();
    let outcome = common::train_model(dir.path());
    let (app, _) = test_app(&outcome.model_path);

    let mut customer = common::customer_json();
    customer.as_object_mut().unwrap().remove("tenure");

    let (status, body) = send(app, post_json("/predict_churn", &customer.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().contains("tenure"));
}

#[tokio::test]
async fn test_wrong_type_is_unprocessable() {
    let dir = tempdir().unwrap();
    let (app, _) = test_app(&dir.path().join("missing.json"));

    let mut customer = common::customer_json();
    customer["MonthlyCharges"] = Value::from("a lot");

    let (status, body) = send(app, post_json("/predict_churn", &customer.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let dir = tempdir().unwrap();
    let (app, _) = test_app(&dir.path().join("missing.json"));

    let (status, body) = send(app, post_json("/predict_churn", "{\"gender\": ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_missing_model_is_unavailable() {
    let dir = tempdir().unwrap();
    let (app, state) = test_app(&dir.path().join("missing.json"));

    let (status, body) = send(app, post_json("/predict_churn", &common::customer_json().to_string())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], true);
    assert!(!state.model.is_loaded());
}

#[tokio::test]
async fn test_model_metadata() {
    let dir = tempdir().unwrap();
    let outcome = common::train_model(dir.path());
    let (app, _) = test_app(&outcome.model_path);

    let (status, body) = send(app, get("/model")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target"], "Churn");
    assert_eq!(body["input_columns"].as_array().unwrap().len(), 19);
    assert!(body["metrics"]["roc_auc"].as_f64().unwrap() > 0.5);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let dir = tempdir().unwrap();
    let (app, _) = test_app(&dir.path().join("missing.json"));

    let (status, body) = send(app, get("/predict")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().contains("/predict_churn"));
}
