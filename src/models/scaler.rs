//! Fitted standard scaler for the cluster features

use crate::error::{ForecastError, Result};
use crate::models::VectorTransform;
use serde::{Deserialize, Serialize};

/// Standard scaler with per-feature mean and scale fit during training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-feature means
    mean: Vec<f64>,
    /// Per-feature scales (standard deviations)
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Create a scaler from fitted parameters
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Check the fitted parameters are usable
    pub fn validate(&self) -> Result<()> {
        if self.mean.is_empty() || self.mean.len() != self.scale.len() {
            return Err(ForecastError::ArtifactError(format!(
                "Scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }

        if self.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(ForecastError::ArtifactError(
                "Scaler contains a zero or non-finite scale".to_string(),
            ));
        }

        Ok(())
    }

    /// Number of features the scaler was fit on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }
}

impl VectorTransform for StandardScaler {
    fn transform(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.mean.len() {
            return Err(ForecastError::SchemaMismatch(format!(
                "Scaler was fit on {} features but received {}",
                self.mean.len(),
                input.len()
            )));
        }

        Ok(input
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect())
    }
}
