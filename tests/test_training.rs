//! Integration test: training workflow end-to-end

mod common;

use churn_predictor::data::get_train_test_data;
use churn_predictor::training::{
    build_preprocessing_and_model, ChurnPipeline, ClassWeight, TrainingConfig,
};
use churn_predictor::preprocessing::PreprocessingConfig;
use tempfile::tempdir;

#[test]
fn test_train_and_evaluate_saves_model() {
    let dir = tempdir().unwrap();
    let outcome = common::train_model(dir.path());

    assert_eq!(outcome.model_path, dir.path().join("models").join("churn_model.json"));
    assert!(outcome.model_path.exists());
    assert!(outcome.auc() > 0.7, "auc = {}", outcome.auc());

    let report = outcome.report();
    assert_eq!(report.classes.len(), 2);
    // 600 rows, 12 blank, 20% held out
    assert_eq!(report.support(), 118);
    assert!(report.to_string().contains("weighted avg"));

    let metadata = outcome.pipeline.metadata();
    assert_eq!(metadata.target, "Churn");
    assert_eq!(metadata.n_train_samples, 470);
    assert_eq!(metadata.input_columns.len(), 19);
    assert!(metadata.metrics["roc_auc"] > 0.7);
    assert_eq!(metadata.hyperparameters["class_weight"], "balanced");
}

#[test]
fn test_saved_model_reloads_with_same_predictions() {
    let dir = tempdir().unwrap();
    let trainer = common::trainer_in(dir.path(), 400);
    let split = get_train_test_data(&trainer.data).unwrap();
    let outcome = trainer.train_on_split(&split).unwrap();

    let reloaded = ChurnPipeline::load(&outcome.model_path).unwrap();
    let before = outcome.pipeline.predict_proba(&split.x_test).unwrap();
    let after = reloaded.predict_proba(&split.x_test).unwrap();
    for (a, b) in before.iter().zip(after.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
    assert_eq!(reloaded.metadata().feature_names, outcome.pipeline.metadata().feature_names);
}

#[test]
fn test_month_to_month_contract_raises_churn() {
    let dir = tempdir().unwrap();
    let outcome = common::train_model(dir.path());

    let coefficients: std::collections::HashMap<String, f64> =
        outcome.pipeline.top_coefficients(usize::MAX).into_iter().collect();
    assert!(coefficients["Contract_Month-to-month"] > coefficients["Contract_Two year"]);
}

#[test]
fn test_balanced_weights_raise_recall() {
    let dir = tempdir().unwrap();
    let trainer = common::trainer_in(dir.path(), 600);
    let split = get_train_test_data(&trainer.data).unwrap();

    let recall = |class_weight: ClassWeight| {
        let training = TrainingConfig::default().with_class_weight(class_weight);
        let mut pipeline =
            build_preprocessing_and_model(&split.x_train, "Churn", &PreprocessingConfig::default(), &training);
        pipeline.fit(&split.x_train, &split.y_train).unwrap();
        let summary = pipeline.evaluate(&split.x_train, &split.y_train).unwrap();
        summary.report.class("1").unwrap().recall
    };

    assert!(recall(ClassWeight::Balanced) > recall(ClassWeight::Uniform));
}
