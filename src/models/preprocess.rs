//! Fitted feature-preprocessing transform for the regression pipeline

use crate::error::{ForecastError, Result};
use crate::features::{FeatureRow, FeatureValue};
use crate::models::RowTransform;
use serde::{Deserialize, Serialize};

/// How one input column was encoded when the pipeline was fit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ColumnEncoding {
    /// Numeric column standardized with a fitted mean and scale
    Numeric { mean: f64, scale: f64 },
    /// Numeric column passed through unchanged
    Passthrough,
    /// Categorical column one-hot encoded over a fixed level set
    Categorical { levels: Vec<String> },
}

/// One column of the fitted input schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Feature row column the spec consumes
    pub name: String,
    /// Encoding fit for that column
    pub encoding: ColumnEncoding,
}

/// The preprocessing transform the regression model was fit behind.
///
/// The column list is the schema as fit: names, order and encodings are
/// fixed. Any drift between this schema and the assembled feature row is a
/// fatal schema mismatch, never silently patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionPreprocess {
    /// Input columns in fit order
    columns: Vec<ColumnSpec>,
}

impl PredictionPreprocess {
    /// Create a transform from its fitted column schema
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self> {
        let preprocess = Self { columns };
        preprocess.validate()?;
        Ok(preprocess)
    }

    /// Check the fitted schema is usable
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(ForecastError::ArtifactError(
                "Preprocess transform has no input columns".to_string(),
            ));
        }

        for spec in &self.columns {
            match &spec.encoding {
                ColumnEncoding::Numeric { scale, .. } => {
                    if !scale.is_finite() || *scale == 0.0 {
                        return Err(ForecastError::ArtifactError(format!(
                            "Column '{}' has a zero or non-finite scale",
                            spec.name
                        )));
                    }
                }
                ColumnEncoding::Categorical { levels } => {
                    if levels.is_empty() {
                        return Err(ForecastError::ArtifactError(format!(
                            "Column '{}' has no categorical levels",
                            spec.name
                        )));
                    }
                }
                ColumnEncoding::Passthrough => {}
            }
        }

        Ok(())
    }

    /// Input columns in fit order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Width of the produced feature vector
    pub fn output_width(&self) -> usize {
        self.columns
            .iter()
            .map(|spec| match &spec.encoding {
                ColumnEncoding::Categorical { levels } => levels.len(),
                _ => 1,
            })
            .sum()
    }
}

impl RowTransform for PredictionPreprocess {
    fn transform_row(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.output_width());

        for spec in &self.columns {
            let value = row.value(&spec.name).ok_or_else(|| {
                ForecastError::SchemaMismatch(format!(
                    "Feature row has no column '{}'",
                    spec.name
                ))
            })?;

            match (&spec.encoding, value) {
                (ColumnEncoding::Numeric { mean, scale }, FeatureValue::Number(v)) => {
                    out.push((v - mean) / scale);
                }
                (ColumnEncoding::Passthrough, FeatureValue::Number(v)) => {
                    out.push(v);
                }
                (ColumnEncoding::Categorical { levels }, FeatureValue::Label(label)) => {
                    let hit = levels.iter().position(|level| level == label).ok_or_else(
                        || {
                            ForecastError::SchemaMismatch(format!(
                                "Unseen level '{}' for column '{}'",
                                label, spec.name
                            ))
                        },
                    )?;
                    for index in 0..levels.len() {
                        out.push(if index == hit { 1.0 } else { 0.0 });
                    }
                }
                (_, value) => {
                    return Err(ForecastError::SchemaMismatch(format!(
                        "Column '{}' received an incompatible value: {:?}",
                        spec.name, value
                    )));
                }
            }
        }

        Ok(out)
    }
}
