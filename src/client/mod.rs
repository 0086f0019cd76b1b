//! HTTP client for the scoring endpoint
//!
//! Reads a customer record from a JSON file, posts it to `/predict_churn`
//! and renders the answer for the terminal.

use crate::error::{ChurnError, Result};
use crate::inference::ChurnPrediction;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Endpoint used when neither `--url` nor `CHURN_API_URL` is given
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/predict_churn";

/// Customer record as read from disk, forwarded to the API untouched
pub type CustomerRecord = Map<String, Value>;

/// `CHURN_API_URL` or the local default
pub fn api_url_from_env() -> String {
    std::env::var("CHURN_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Read a customer record; the file must hold a single JSON object
pub fn load_customer_from_json(path: &Path) -> Result<CustomerRecord> {
    if !path.exists() {
        return Err(ChurnError::DataError(format!(
            "Customer file not found: {}",
            path.display()
        )));
    }

    let text = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Object(map) => Ok(map),
        other => Err(ChurnError::InvalidInput(format!(
            "Customer JSON must contain an object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reusable client bound to one endpoint
#[derive(Debug, Clone)]
pub struct ChurnClient {
    http: reqwest::Client,
    url: String,
}

impl ChurnClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the record and decode the prediction. Any status other than
    /// 200 is returned as [`ChurnError::Api`] with the response body.
    pub async fn predict<T: Serialize + ?Sized>(&self, customer: &T) -> Result<ChurnPrediction> {
        debug!(url = %self.url, "Calling churn API");
        let response = self.http.post(&self.url).json(customer).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ChurnError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<ChurnPrediction>().await?)
    }
}

/// One-shot call to the scoring endpoint at `url`
pub async fn call_churn_api<T: Serialize + ?Sized>(url: &str, customer: &T) -> Result<ChurnPrediction> {
    ChurnClient::new(url)?.predict(customer).await
}

/// Human-readable summary of a customer and its prediction
pub fn format_result(customer: &CustomerRecord, result: &ChurnPrediction) -> Result<String> {
    let mut pretty = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut pretty, formatter);
    customer.serialize(&mut serializer)?;
    let pretty = String::from_utf8_lossy(&pretty);

    Ok(format!(
        "=== Customer ===\n{}\n\n=== Model result ===\n\
         Churn probability: {:.3}\n\
         Prediction (0 = no churn, 1 = churn): {}\n\
         Risk level: {}\n",
        pretty, result.churn_probability, result.churn_prediction, result.risk_label
    ))
}

pub fn print_result(customer: &CustomerRecord, result: &ChurnPrediction) -> Result<()> {
    print!("{}", format_result(customer, result)?);
    Ok(())
}
