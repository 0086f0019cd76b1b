//! Classification metrics: per-class report and ROC AUC

use crate::error::{ChurnError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Precision, recall and F1 for one class (or one average row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Per-class classification report with accuracy and averages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

impl ClassificationReport {
    /// Build the report from true and predicted labels.
    ///
    /// Classes are the sorted union of labels seen in either array.
    /// Undefined precision or recall (empty denominator) is reported as 0.
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(ChurnError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(ChurnError::InvalidInput(
                "cannot build a classification report from zero samples".to_string(),
            ));
        }

        // label -> (true count, predicted count, true positives)
        let mut counts: BTreeMap<i64, (usize, usize, usize)> = BTreeMap::new();
        let mut correct = 0;
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            let (t, p) = (t.round() as i64, p.round() as i64);
            counts.entry(t).or_default().0 += 1;
            counts.entry(p).or_default().1 += 1;
            if t == p {
                counts.entry(t).or_default().2 += 1;
                correct += 1;
            }
        }

        let total = y_true.len();
        let classes: Vec<ClassMetrics> = counts
            .iter()
            .map(|(label, &(support, predicted, tp))| {
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                ClassMetrics {
                    label: label.to_string(),
                    precision,
                    recall,
                    f1_score: f1(precision, recall),
                    support,
                }
            })
            .collect();

        let n_classes = classes.len() as f64;
        let macro_avg = ClassMetrics {
            label: "macro avg".to_string(),
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n_classes,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n_classes,
            f1_score: classes.iter().map(|c| c.f1_score).sum::<f64>() / n_classes,
            support: total,
        };

        let weighted = |metric: fn(&ClassMetrics) -> f64| {
            classes.iter().map(|c| metric(c) * c.support as f64).sum::<f64>() / total as f64
        };
        let weighted_avg = ClassMetrics {
            label: "weighted avg".to_string(),
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1_score: weighted(|c| c.f1_score),
            support: total,
        };

        Ok(Self {
            classes,
            accuracy: ratio(correct, total),
            macro_avg,
            weighted_avg,
        })
    }

    /// Metrics row for a class label such as `"1"`
    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }

    /// Total number of evaluated samples
    pub fn support(&self) -> usize {
        self.weighted_avg.support
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .chain(std::iter::once(self.weighted_avg.label.len()))
            .max()
            .unwrap_or(12);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support",
            width = width
        )?;
        writeln!(f)?;

        let row = |f: &mut fmt::Formatter<'_>, m: &ClassMetrics| {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.label, m.precision, m.recall, m.f1_score, m.support,
                width = width
            )
        };

        for class in &self.classes {
            row(f, class)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.support(),
            width = width
        )?;
        row(f, &self.macro_avg)?;
        row(f, &self.weighted_avg)
    }
}

/// Area under the ROC curve for 0/1 labels and positive-class scores.
///
/// Computed from the Mann-Whitney rank statistic; tied scores share their
/// average rank.
pub fn roc_auc_score(y_true: &Array1<f64>, y_score: &Array1<f64>) -> Result<f64> {
    if y_true.len() != y_score.len() {
        return Err(ChurnError::ShapeError {
            expected: format!("{} scores", y_true.len()),
            actual: format!("{} scores", y_score.len()),
        });
    }

    let n_pos = y_true.iter().filter(|&&v| v == 1.0).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(ChurnError::InvalidInput(
            "Only one class present in y_true. ROC AUC score is not defined in that case."
                .to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| y_score[a].total_cmp(&y_score[b]));

    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && y_score[order[j + 1]] == y_score[order[i]] {
            j += 1;
        }
        // Ranks are 1-based; ties get the mean of ranks i+1..=j+1
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            if y_true[idx] == 1.0 {
                rank_sum_pos += avg_rank;
            }
        }
        i = j + 1;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Ok((rank_sum_pos - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

/// Held-out evaluation of a fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub report: ClassificationReport,
    pub auc: f64,
}

impl EvaluationSummary {
    /// Evaluate predicted labels and positive-class probabilities
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>, y_proba: &Array1<f64>) -> Result<Self> {
        Ok(Self {
            report: ClassificationReport::compute(y_true, y_pred)?,
            auc: roc_auc_score(y_true, y_proba)?,
        })
    }

    /// Flat name -> value map, stored with the persisted model
    pub fn as_metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();
        metrics.insert("roc_auc".to_string(), self.auc);
        metrics.insert("accuracy".to_string(), self.report.accuracy);
        if let Some(positive) = self.report.class("1") {
            metrics.insert("precision".to_string(), positive.precision);
            metrics.insert("recall".to_string(), positive.recall);
            metrics.insert("f1_score".to_string(), positive.f1_score);
        }
        metrics
    }
}
