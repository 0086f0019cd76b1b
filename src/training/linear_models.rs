//! Linear model implementations

use crate::error::{ChurnError, Result};
use ndarray::{s, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Solve symmetric positive-definite system Ax = b using Cholesky decomposition.
/// Returns `None` when A is not numerically positive definite.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    // A = L * L^T
    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L * y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * y[j]).sum();
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Cholesky solve, retrying once with a small diagonal jitter
fn solve_spd(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    cholesky_solve(a, b).or_else(|| {
        let n = a.nrows();
        let jitter = 1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>().max(1.0) / n as f64;
        let mut regularized = a.clone();
        for k in 0..n {
            regularized[[k, k]] += jitter;
        }
        cholesky_solve(&regularized, b)
    })
}

/// Numerically stable logistic function
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// log(1 + exp(z)) without overflow
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// Per-class sample weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassWeight {
    /// Every sample weighs 1
    Uniform,
    /// Weight of class c is n_samples / (n_classes * count_c)
    Balanced,
}

impl FromStr for ClassWeight {
    type Err = ChurnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "balanced" => Ok(ClassWeight::Balanced),
            "uniform" | "none" => Ok(ClassWeight::Uniform),
            other => Err(ChurnError::InvalidParameter {
                name: "class_weight".to_string(),
                value: other.to_string(),
                reason: "expected balanced or uniform".to_string(),
            }),
        }
    }
}

impl ClassWeight {
    /// Weight per sample for 0/1 labels
    pub fn sample_weights(&self, y: &Array1<f64>) -> Array1<f64> {
        match self {
            ClassWeight::Uniform => Array1::ones(y.len()),
            ClassWeight::Balanced => {
                let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
                for &label in y.iter() {
                    *counts.entry(label.round() as i64).or_insert(0) += 1;
                }
                let n = y.len() as f64;
                let n_classes = counts.len() as f64;
                y.mapv(|label| {
                    let count = counts.get(&(label.round() as i64)).copied().unwrap_or(1);
                    n / (n_classes * count as f64)
                })
            }
        }
    }
}

/// L2-regularised logistic regression for binary classification.
///
/// Minimises `C * sum_i s_i * logloss_i + ||w||^2 / 2` with per-sample
/// weights `s_i` from the class weighting. The intercept is not penalised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Fitted coefficients
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept
    pub intercept: Option<f64>,
    /// Whether to fit intercept
    pub fit_intercept: bool,
    /// Inverse regularization strength
    pub c: f64,
    /// Maximum Newton iterations
    pub max_iter: usize,
    /// Convergence tolerance on the weight-normalised gradient
    pub tol: f64,
    /// Class weighting
    pub class_weight: ClassWeight,
    /// Iterations used by the last fit
    pub n_iter: usize,
    /// Whether model is fitted
    pub is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Create a new logistic regression model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            c: 1.0,
            max_iter: 1000,
            tol: 1e-6,
            class_weight: ClassWeight::Uniform,
            n_iter: 0,
            is_fitted: false,
        }
    }

    /// Set inverse regularization strength
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set class weighting
    pub fn with_class_weight(mut self, class_weight: ClassWeight) -> Self {
        self.class_weight = class_weight;
        self
    }

    /// Enable/disable fitting intercept
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Fit with damped Newton iterations
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(ChurnError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        if self.c <= 0.0 {
            return Err(ChurnError::InvalidParameter {
                name: "c".to_string(),
                value: self.c.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        if y.iter().any(|&v| v != 0.0 && v != 1.0) {
            return Err(ChurnError::TrainingError("labels must be 0 or 1".to_string()));
        }
        let positives = y.iter().filter(|&&v| v == 1.0).count();
        if positives == 0 || positives == n_samples {
            return Err(ChurnError::TrainingError(
                "training data contains a single class".to_string(),
            ));
        }

        // Design matrix with a trailing column of ones for the intercept
        let n_params = n_features + usize::from(self.fit_intercept);
        let mut design = Array2::<f64>::ones((n_samples, n_params));
        design.slice_mut(s![.., ..n_features]).assign(x);

        let weights = self.class_weight.sample_weights(y);
        let weight_total = weights.sum();
        // Penalty applies to every parameter but the intercept
        let mut penalty = Array1::<f64>::ones(n_params);
        if self.fit_intercept {
            penalty[n_features] = 0.0;
        }

        let c = self.c;
        let objective = |theta: &Array1<f64>| -> f64 {
            let z = design.dot(theta);
            let loss: f64 = z
                .iter()
                .zip(y.iter())
                .zip(weights.iter())
                .map(|((&zi, &yi), &si)| si * (softplus(zi) - yi * zi))
                .sum();
            c * loss + 0.5 * (theta * theta * &penalty).sum()
        };

        let mut theta = Array1::<f64>::zeros(n_params);
        let mut current = objective(&theta);
        self.n_iter = 0;

        for iter in 0..self.max_iter {
            self.n_iter = iter + 1;

            let z = design.dot(&theta);
            let p = z.mapv(sigmoid);

            let residual = (&p - y) * &weights * c;
            let gradient = design.t().dot(&residual) + &theta * &penalty;

            let grad_norm = gradient.iter().fold(0.0f64, |m, g| m.max(g.abs())) / weight_total;
            if grad_norm < self.tol {
                break;
            }

            // H = X^T diag(c * s * p * (1 - p)) X + diag(penalty)
            let curvature = &p.mapv(|pi| pi * (1.0 - pi)) * &weights * c;
            let weighted = &design * &curvature.view().insert_axis(Axis(1));
            let mut hessian = design.t().dot(&weighted);
            for k in 0..n_params {
                hessian[[k, k]] += penalty[k];
            }

            let step = solve_spd(&hessian, &gradient).ok_or_else(|| {
                ChurnError::TrainingError("Hessian is not positive definite".to_string())
            })?;

            // Backtracking line search on the objective
            let slope = gradient.dot(&step);
            let mut t = 1.0;
            let mut candidate = &theta - &(&step * t);
            let mut value = objective(&candidate);
            while value > current - 1e-4 * t * slope && t > 1e-10 {
                t *= 0.5;
                candidate = &theta - &(&step * t);
                value = objective(&candidate);
            }

            if t <= 1e-10 {
                // No further decrease possible at machine precision
                break;
            }

            theta = candidate;
            current = value;
        }

        self.coefficients = Some(theta.slice(s![..n_features]).to_owned());
        self.intercept = Some(if self.fit_intercept { theta[n_features] } else { 0.0 });
        self.is_fitted = true;

        Ok(self)
    }

    /// Raw linear scores `Xw + b`
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(coefficients), true) => coefficients,
            _ => return Err(ChurnError::ModelNotFitted),
        };

        if x.ncols() != coefficients.len() {
            return Err(ChurnError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }

    /// Predict probabilities of the positive class
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self.decision_function(x)?.mapv(sigmoid))
    }

    /// Predict class labels
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p > 0.5 { 1.0 } else { 0.0 }))
    }

    /// Get accuracy score
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;

        let correct = y_pred.iter().zip(y.iter())
            .filter(|(pred, actual)| (*pred - *actual).abs() < 0.5)
            .count();

        Ok(correct as f64 / y.len() as f64)
    }
}
