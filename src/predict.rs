//! Prediction assembly
//!
//! Combines the time feature derivation, cluster estimation and historical
//! aggregates into the feature row the pretrained pipeline expects, then runs
//! the preprocessing transform and the regression model. The loaded dataset
//! and artifacts form one immutable context object created at startup and
//! reused for every prediction.

use crate::data::{DataLoader, SalesHistory};
use crate::error::{ForecastError, Result};
use crate::features::{derive_time_features, FeatureRow};
use crate::models::{ClusterAssign, ModelSet, Predict, RowTransform, VectorTransform};
use std::path::Path;

/// Upper bound accepted for the user-chosen mean price
pub const MAX_MEAN_PRICE: f64 = 10_000.0;

/// One user-supplied prediction scenario
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    store_code: String,
    item: String,
    year: i32,
    month: u32,
    mean_price: f64,
}

impl PredictionRequest {
    /// Create a validated prediction request
    pub fn new(
        store_code: impl Into<String>,
        item: impl Into<String>,
        year: i32,
        month: u32,
        mean_price: f64,
    ) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidParameter(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }

        if !mean_price.is_finite() || !(0.0..=MAX_MEAN_PRICE).contains(&mean_price) {
            return Err(ForecastError::InvalidParameter(format!(
                "Mean price must be between 0 and {}, got {}",
                MAX_MEAN_PRICE, mean_price
            )));
        }

        Ok(Self {
            store_code: store_code.into(),
            item: item.into(),
            year,
            month,
            mean_price,
        })
    }

    /// Store code the scenario targets
    pub fn store_code(&self) -> &str {
        &self.store_code
    }

    /// Item the scenario targets
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Target calendar year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Target month (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// User-chosen mean price
    pub fn mean_price(&self) -> f64 {
        self.mean_price
    }
}

/// Intermediate values behind a prediction, kept for display and audit
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    /// Extrapolated time index of the target period
    pub time_index: i64,
    /// Cyclical month encoding, sine part
    pub month_sin: f64,
    /// Cyclical month encoding, cosine part
    pub month_cos: f64,
    /// Cluster assigned to the scenario
    pub cluster_id: i64,
    /// Mean historical sales of the item across all stores
    pub item_mean_sales: f64,
    /// Mean historical sales of the store across all items
    pub store_mean_sales: f64,
    /// Mean historical sales of the store+item pair
    pub store_item_mean_sales: f64,
}

/// Result of one prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Continuous value produced by the regression model
    pub raw: f64,
    /// Predicted unit sales, rounded half-to-even
    pub sales: i64,
    /// Intermediate values behind the prediction
    pub diagnostics: Diagnostics,
}

/// Immutable prediction context: the historical dataset plus the four
/// pretrained artifacts, loaded once at startup
#[derive(Debug, Clone)]
pub struct SalesPredictor {
    history: SalesHistory,
    models: ModelSet,
}

impl SalesPredictor {
    /// Build a predictor from already-loaded state
    pub fn new(history: SalesHistory, models: ModelSet) -> Self {
        Self { history, models }
    }

    /// Load the dataset (parquet) and the artifact directory
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(data_path: P, models_dir: Q) -> Result<Self> {
        let history = DataLoader::from_parquet(data_path)?;
        let models = ModelSet::load(models_dir)?;

        Ok(Self::new(history, models))
    }

    /// Get the historical dataset
    pub fn history(&self) -> &SalesHistory {
        &self.history
    }

    /// Predict monthly unit sales for one scenario.
    ///
    /// Steps, in order: derive time features from the dataset anchor,
    /// estimate the cluster, look up the three historical aggregates,
    /// assemble the feature row, preprocess, predict, round. A schema
    /// rejection anywhere in the model chain fails the whole prediction;
    /// there is no partial result.
    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction> {
        let anchor = self.history.anchor();
        let time = derive_time_features(request.year(), request.month(), &anchor);

        let cluster_id = self.estimate_cluster(
            request.mean_price(),
            time.time_index,
            time.month_sin,
            time.month_cos,
        )?;

        let item_mean_sales = self.history.item_mean_sales(request.item());
        let store_mean_sales = self.history.store_mean_sales(request.store_code());
        let store_item_mean_sales = self
            .history
            .store_item_mean_sales(request.store_code(), request.item());

        let row = FeatureRow {
            store_code: request.store_code().to_string(),
            item: request.item().to_string(),
            mean_price: request.mean_price(),
            year: request.year(),
            month: request.month(),
            time_index: time.time_index,
            month_sin: time.month_sin,
            month_cos: time.month_cos,
            cluster_id,
            item_mean_sales,
            store_mean_sales,
            store_item_mean_sales,
        };

        let features = self.models.preprocess.transform_row(&row)?;
        let raw = self.models.regression.predict(&features)?;

        if !raw.is_finite() {
            return Err(ForecastError::PredictionError(format!(
                "Regression model produced a non-finite value: {}",
                raw
            )));
        }

        Ok(Prediction {
            raw,
            sales: round_half_even(raw),
            diagnostics: Diagnostics {
                time_index: time.time_index,
                month_sin: time.month_sin,
                month_cos: time.month_cos,
                cluster_id,
                item_mean_sales,
                store_mean_sales,
                store_item_mean_sales,
            },
        })
    }

    /// Scale the cluster features and assign the nearest cluster.
    ///
    /// The vector order [mean_price, time_index, month_sin, month_cos] is the
    /// order the scaler and cluster model were fit on.
    fn estimate_cluster(
        &self,
        mean_price: f64,
        time_index: i64,
        month_sin: f64,
        month_cos: f64,
    ) -> Result<i64> {
        let input = [mean_price, time_index as f64, month_sin, month_cos];
        let scaled = self.models.scaler.transform(&input)?;
        let cluster = self.models.kmeans.assign(&scaled)?;

        Ok(cluster as i64)
    }
}

/// Round to the nearest integer with ties going to the even neighbor,
/// matching the rounding rule the training runtime applies to the
/// continuous prediction
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}
