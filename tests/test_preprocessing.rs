//! Integration test: column transformer on the prepared churn features

mod common;

use churn_predictor::data::{get_train_test_data, DataConfig};
use churn_predictor::preprocessing::{ColumnTransformer, PreprocessingConfig, UnknownCategory};
use churn_predictor::ChurnError;
use polars::prelude::*;
use tempfile::tempdir;

fn prepared() -> churn_predictor::data::TrainTestSplit {
    let dir = tempdir().unwrap();
    let csv = common::write_telco_csv(dir.path(), 300, 11);
    get_train_test_data(&DataConfig::default().with_csv_path(csv)).unwrap()
}

#[test]
fn test_column_routing_on_churn_features() {
    let split = prepared();
    let mut transformer = ColumnTransformer::new(PreprocessingConfig::default());
    transformer.select_columns(&split.x_train);

    assert_eq!(
        transformer.numeric_columns(),
        &["SeniorCitizen", "tenure", "MonthlyCharges", "TotalCharges"]
            .map(String::from)
    );
    assert_eq!(transformer.categorical_columns().len(), 15);
    assert!(transformer.dropped_columns().is_empty());
}

#[test]
fn test_fit_on_train_transform_test() {
    let split = prepared();
    let mut transformer = ColumnTransformer::new(PreprocessingConfig::default());
    let train = transformer.fit_transform(&split.x_train).unwrap();
    let test = transformer.transform(&split.x_test).unwrap();

    assert_eq!(train.nrows(), split.x_train.height());
    assert_eq!(test.nrows(), split.x_test.height());
    assert_eq!(train.ncols(), test.ncols());
    assert_eq!(train.ncols(), transformer.feature_names().len());

    // Each categorical block is one-hot: 15 ones per row when every category was seen
    for row in train.rows() {
        let ones = row.iter().skip(4).filter(|&&v| v == 1.0).count();
        assert_eq!(ones, 15);
    }

    assert!(transformer
        .feature_names()
        .contains(&"Contract_Month-to-month".to_string()));
}

#[test]
fn test_unseen_category_policy() {
    let split = prepared();
    let mut row = split.x_test.head(Some(1));
    row.with_column(Column::new("PaymentMethod".into(), &["Crypto"])).unwrap();

    let mut lenient = ColumnTransformer::new(PreprocessingConfig::default());
    lenient.fit(&split.x_train).unwrap();
    assert!(lenient.transform(&row).is_ok());

    let strict_config = PreprocessingConfig::default().with_handle_unknown(UnknownCategory::Error);
    let mut strict = ColumnTransformer::new(strict_config);
    strict.fit(&split.x_train).unwrap();
    assert!(matches!(
        strict.transform(&row),
        Err(ChurnError::PreprocessingError(_))
    ));
}
