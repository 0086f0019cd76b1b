//! Single-customer input record

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One customer as sent to the scoring endpoint. Field names on the wire
/// match the columns of the training table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFeatures {
    pub gender: String,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: i64,
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Dependents")]
    pub dependents: String,
    pub tenure: i64,
    #[serde(rename = "PhoneService")]
    pub phone_service: String,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: String,
    #[serde(rename = "InternetService")]
    pub internet_service: String,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: String,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: String,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: String,
    #[serde(rename = "TechSupport")]
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: String,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: String,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,
}

impl CustomerFeatures {
    /// One-row frame with the training column names and dtypes
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let df = df!(
            "gender" => &[self.gender.as_str()],
            "SeniorCitizen" => &[self.senior_citizen],
            "Partner" => &[self.partner.as_str()],
            "Dependents" => &[self.dependents.as_str()],
            "tenure" => &[self.tenure],
            "PhoneService" => &[self.phone_service.as_str()],
            "MultipleLines" => &[self.multiple_lines.as_str()],
            "InternetService" => &[self.internet_service.as_str()],
            "OnlineSecurity" => &[self.online_security.as_str()],
            "OnlineBackup" => &[self.online_backup.as_str()],
            "DeviceProtection" => &[self.device_protection.as_str()],
            "TechSupport" => &[self.tech_support.as_str()],
            "StreamingTV" => &[self.streaming_tv.as_str()],
            "StreamingMovies" => &[self.streaming_movies.as_str()],
            "Contract" => &[self.contract.as_str()],
            "PaperlessBilling" => &[self.paperless_billing.as_str()],
            "PaymentMethod" => &[self.payment_method.as_str()],
            "MonthlyCharges" => &[self.monthly_charges],
            "TotalCharges" => &[self.total_charges],
        )?;
        Ok(df)
    }
}

#[cfg(test)]
pub(crate) fn example_customer() -> CustomerFeatures {
    CustomerFeatures {
        gender: "Female".to_string(),
        senior_citizen: 0,
        partner: "Yes".to_string(),
        dependents: "No".to_string(),
        tenure: 1,
        phone_service: "No".to_string(),
        multiple_lines: "No phone service".to_string(),
        internet_service: "DSL".to_string(),
        online_security: "No".to_string(),
        online_backup: "Yes".to_string(),
        device_protection: "No".to_string(),
        tech_support: "No".to_string(),
        streaming_tv: "No".to_string(),
        streaming_movies: "No".to_string(),
        contract: "Month-to-month".to_string(),
        paperless_billing: "Yes".to_string(),
        payment_method: "Electronic check".to_string(),
        monthly_charges: 29.85,
        total_charges: 29.85,
    }
}
