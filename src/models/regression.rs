//! Fitted regression model

use crate::error::{ForecastError, Result};
use crate::models::Predict;
use serde::{Deserialize, Serialize};

/// The selected regression model, reduced to its fitted linear form:
/// a coefficient per preprocessed feature plus an intercept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionModel {
    /// Per-feature coefficients over the preprocessed vector
    coefficients: Vec<f64>,
    /// Fitted intercept
    intercept: f64,
}

impl RegressionModel {
    /// Create a regression model from fitted parameters
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check the fitted parameters are usable
    pub fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(ForecastError::ArtifactError(
                "Regression model has no coefficients".to_string(),
            ));
        }

        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err(ForecastError::ArtifactError(
                "Regression model contains non-finite parameters".to_string(),
            ));
        }

        Ok(())
    }

    /// Number of preprocessed features the model expects
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }
}

impl Predict for RegressionModel {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(ForecastError::SchemaMismatch(format!(
                "Regression model was fit on {} features but received {}",
                self.coefficients.len(),
                features.len()
            )));
        }

        let value = self
            .coefficients
            .iter()
            .zip(features.iter())
            .map(|(c, f)| c * f)
            .sum::<f64>()
            + self.intercept;

        Ok(value)
    }
}
