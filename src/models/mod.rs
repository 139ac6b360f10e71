//! Pretrained artifacts for sales prediction
//!
//! Four fitted objects come out of the training pipeline: the feature
//! preprocessing transform, the regression model, the cluster feature scaler
//! and the cluster-assignment model. They are opaque here, reduced to their
//! fitted parameters and call contracts, and are loaded read-only once at
//! process start.

use crate::error::{ForecastError, Result};
use crate::features::FeatureRow;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub mod kmeans;
pub mod preprocess;
pub mod regression;
pub mod scaler;

pub use kmeans::KMeansModel;
pub use preprocess::PredictionPreprocess;
pub use regression::RegressionModel;
pub use scaler::StandardScaler;

/// Vector-to-vector transform capability of a fitted artifact
pub trait VectorTransform {
    /// Transform a feature vector
    fn transform(&self, input: &[f64]) -> Result<Vec<f64>>;
}

/// Nearest-cluster assignment capability of a fitted artifact
pub trait ClusterAssign {
    /// Assign a feature vector to its nearest cluster
    fn assign(&self, input: &[f64]) -> Result<usize>;
}

/// Row-to-vector preprocessing capability of a fitted artifact
pub trait RowTransform {
    /// Transform a named feature row into the model input vector
    fn transform_row(&self, row: &FeatureRow) -> Result<Vec<f64>>;
}

/// Regression capability of a fitted artifact
pub trait Predict {
    /// Predict a continuous value from a preprocessed feature vector
    fn predict(&self, features: &[f64]) -> Result<f64>;
}

/// File name of the preprocessing transform artifact
pub const PREPROCESS_FILE: &str = "preprocess_prediction.json";
/// File name of the regression model artifact
pub const REGRESSION_FILE: &str = "best_model.json";
/// File name of the cluster feature scaler artifact
pub const SCALER_FILE: &str = "scaler_cluster.json";
/// File name of the cluster-assignment artifact
pub const KMEANS_FILE: &str = "kmeans_cluster.json";

/// The four pretrained artifacts, loaded together
#[derive(Debug, Clone)]
pub struct ModelSet {
    /// Feature preprocessing transform fit with the regression model
    pub preprocess: PredictionPreprocess,
    /// The regression model itself
    pub regression: RegressionModel,
    /// Scaler fit on the cluster features
    pub scaler: StandardScaler,
    /// Cluster-assignment model fit on the scaled cluster features
    pub kmeans: KMeansModel,
}

impl ModelSet {
    /// Load all four artifacts from a directory.
    ///
    /// Any missing or malformed file is fatal, as is an internal
    /// inconsistency between the preprocessing output width and the
    /// regression input width.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let preprocess: PredictionPreprocess = load_artifact(&dir.join(PREPROCESS_FILE))?;
        let regression: RegressionModel = load_artifact(&dir.join(REGRESSION_FILE))?;
        let scaler: StandardScaler = load_artifact(&dir.join(SCALER_FILE))?;
        let kmeans: KMeansModel = load_artifact(&dir.join(KMEANS_FILE))?;

        preprocess.validate()?;
        regression.validate()?;
        scaler.validate()?;
        kmeans.validate()?;

        if preprocess.output_width() != regression.n_features() {
            return Err(ForecastError::SchemaMismatch(format!(
                "Preprocess produces {} features but the regression model expects {}",
                preprocess.output_width(),
                regression.n_features()
            )));
        }
        if scaler.n_features() != kmeans.n_features() {
            return Err(ForecastError::SchemaMismatch(format!(
                "Cluster scaler expects {} features but the cluster model expects {}",
                scaler.n_features(),
                kmeans.n_features()
            )));
        }

        Ok(Self {
            preprocess,
            regression,
            scaler,
            kmeans,
        })
    }
}

/// Deserialize one artifact document
fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| {
        ForecastError::ArtifactError(format!("Cannot open artifact '{}': {}", path.display(), e))
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        ForecastError::ArtifactError(format!("Cannot parse artifact '{}': {}", path.display(), e))
    })
}
