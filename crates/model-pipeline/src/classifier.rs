//! Logistic Regression Classifier
//!
//! Thin wrapper over `linfa-logistic`. The solver is L-BFGS with an L2
//! penalty; results are deterministic for fixed inputs.

use crate::PipelineError;
use linfa::prelude::*;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Iteration bound for the solver
    pub max_iterations: u64,
    /// L2 penalty strength
    pub alpha: f64,
    /// Stop once the gradient norm falls below this
    pub gradient_tolerance: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            alpha: 1.0,
            gradient_tolerance: 1e-4,
        }
    }
}

impl fmt::Display for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LogisticRegression(max_iter={}, alpha={}, tol={})",
            self.max_iterations, self.alpha, self.gradient_tolerance
        )
    }
}

/// A fitted binary logistic model over `0`/`1` labels
#[derive(Serialize, Deserialize)]
pub struct FittedClassifier {
    model: FittedLogisticRegression<f64, usize>,
    n_features: usize,
}

impl fmt::Debug for FittedClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FittedClassifier")
            .field("n_features", &self.n_features)
            .field("intercept", &self.model.intercept())
            .field("params", self.model.params())
            .finish()
    }
}

impl FittedClassifier {
    /// Fit on a design matrix and labels. Both classes must be present.
    pub fn fit(config: &ClassifierConfig, x: &Array2<f64>, y: &[usize]) -> Result<Self, PipelineError> {
        let dataset = Dataset::new(x.clone(), Array1::from(y.to_vec()));
        let model = LogisticRegression::default()
            .max_iterations(config.max_iterations)
            .alpha(config.alpha)
            .gradient_tolerance(config.gradient_tolerance)
            .fit(&dataset)
            .map_err(|e| PipelineError::Solver(e.to_string()))?;

        debug!(
            features = x.ncols(),
            intercept = model.intercept(),
            "Fitted logistic regression"
        );
        Ok(Self {
            model,
            n_features: x.ncols(),
        })
    }

    /// Predicted label per row
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>, PipelineError> {
        if x.ncols() != self.n_features {
            return Err(PipelineError::InvalidInput(format!(
                "expected {} features, got {}",
                self.n_features,
                x.ncols()
            )));
        }
        Ok(self.model.predict(x).to_vec())
    }

    /// Feature weights in matrix column order
    pub fn weights(&self) -> &Array1<f64> {
        self.model.params()
    }

    /// Bias term
    pub fn intercept(&self) -> f64 {
        self.model.intercept()
    }

    /// Number of input features
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
