//! Shared fixtures: a synthetic telco churn table and a trained model

#![allow(dead_code)]

use churn_predictor::data::DataConfig;
use churn_predictor::preprocessing::PreprocessingConfig;
use churn_predictor::training::{Trainer, TrainingConfig, TrainingOutcome};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "customerID,gender,SeniorCitizen,Partner,Dependents,tenure,PhoneService,\
MultipleLines,InternetService,OnlineSecurity,OnlineBackup,DeviceProtection,TechSupport,\
StreamingTV,StreamingMovies,Contract,PaperlessBilling,PaymentMethod,MonthlyCharges,TotalCharges,Churn";

fn pick<'a>(rng: &mut ChaCha8Rng, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

/// Telco-shaped CSV with `n` customers. Churn is more likely for short
/// month-to-month fiber customers paying by electronic check. Every 50th
/// customer has zero tenure and a blank TotalCharges, as in the real file.
pub fn telco_csv(n: usize, seed: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = String::from(HEADER);
    out.push('\n');

    for i in 0..n {
        let blank_total = i % 50 == 49;
        let tenure: i64 = if blank_total { 0 } else { rng.gen_range(1..=72) };
        let contract = pick(&mut rng, &["Month-to-month", "Month-to-month", "One year", "Two year"]);
        let internet = pick(&mut rng, &["DSL", "Fiber optic", "No"]);
        let phone = pick(&mut rng, &["Yes", "Yes", "No"]);
        let multiple_lines = if phone == "No" {
            "No phone service"
        } else {
            pick(&mut rng, &["Yes", "No"])
        };
        let addon = |rng: &mut ChaCha8Rng| {
            if internet == "No" {
                "No internet service"
            } else {
                pick(rng, &["Yes", "No"])
            }
        };
        let online_security = addon(&mut rng);
        let online_backup = addon(&mut rng);
        let device_protection = addon(&mut rng);
        let tech_support = addon(&mut rng);
        let streaming_tv = addon(&mut rng);
        let streaming_movies = addon(&mut rng);
        let payment = pick(
            &mut rng,
            &[
                "Electronic check",
                "Mailed check",
                "Bank transfer (automatic)",
                "Credit card (automatic)",
            ],
        );

        let monthly: f64 = match internet {
            "Fiber optic" => rng.gen_range(70.0..110.0),
            "DSL" => rng.gen_range(40.0..70.0),
            _ => rng.gen_range(18.0..26.0),
        };
        let monthly = (monthly * 100.0).round() / 100.0;
        let total = if blank_total {
            " ".to_string()
        } else {
            format!("{:.2}", monthly * tenure as f64)
        };

        let mut logit = -1.2 - 0.05 * tenure as f64;
        if contract == "Month-to-month" {
            logit += 2.0;
        }
        if internet == "Fiber optic" {
            logit += 0.9;
        }
        if payment == "Electronic check" {
            logit += 0.7;
        }
        let p = 1.0 / (1.0 + (-logit).exp());
        let churn = if rng.gen::<f64>() < p { "Yes" } else { "No" };

        let _ = writeln!(
            out,
            "{:04}-TEST,{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            i,
            pick(&mut rng, &["Female", "Male"]),
            u8::from(rng.gen_bool(0.16)),
            pick(&mut rng, &["Yes", "No"]),
            pick(&mut rng, &["Yes", "No"]),
            tenure,
            phone,
            multiple_lines,
            internet,
            online_security,
            online_backup,
            device_protection,
            tech_support,
            streaming_tv,
            streaming_movies,
            contract,
            pick(&mut rng, &["Yes", "No"]),
            payment,
            monthly,
            total,
            churn,
        );
    }

    out
}

/// Write the synthetic table into `dir` and return its path
pub fn write_telco_csv(dir: &Path, n: usize, seed: u64) -> PathBuf {
    let path = dir.join("telco.csv");
    std::fs::write(&path, telco_csv(n, seed)).unwrap();
    path
}

/// Trainer reading from and writing into `dir`
pub fn trainer_in(dir: &Path, n: usize) -> Trainer {
    let csv = write_telco_csv(dir, n, 7);
    Trainer::new(
        DataConfig::default().with_csv_path(csv),
        PreprocessingConfig::default(),
        TrainingConfig::default().with_models_dir(dir.join("models")),
    )
}

/// Train on 600 synthetic customers; the model is saved under `dir/models`
pub fn train_model(dir: &Path) -> TrainingOutcome {
    trainer_in(dir, 600).train_and_evaluate().unwrap()
}

/// Request body for a high-risk customer
pub fn customer_json() -> Value {
    json!({
        "gender": "Female",
        "SeniorCitizen": 0,
        "Partner": "No",
        "Dependents": "No",
        "tenure": 2,
        "PhoneService": "Yes",
        "MultipleLines": "No",
        "InternetService": "Fiber optic",
        "OnlineSecurity": "No",
        "OnlineBackup": "No",
        "DeviceProtection": "No",
        "TechSupport": "No",
        "StreamingTV": "Yes",
        "StreamingMovies": "No",
        "Contract": "Month-to-month",
        "PaperlessBilling": "Yes",
        "PaymentMethod": "Electronic check",
        "MonthlyCharges": 89.1,
        "TotalCharges": 178.2
    })
}

/// Request body for a long-tenure two-year customer
pub fn loyal_customer_json() -> Value {
    let mut value = customer_json();
    let object = value.as_object_mut().unwrap();
    object.insert("tenure".into(), json!(70));
    object.insert("Contract".into(), json!("Two year"));
    object.insert("InternetService".into(), json!("DSL"));
    object.insert("PaymentMethod".into(), json!("Credit card (automatic)"));
    object.insert("MonthlyCharges".into(), json!(55.0));
    object.insert("TotalCharges".into(), json!(3850.0));
    value
}
