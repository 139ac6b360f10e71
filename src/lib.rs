//! # Sales Forecast
//!
//! Monthly store/item sales prediction from pretrained artifacts.
//!
//! The crate wraps a regression pipeline and a clustering model trained
//! elsewhere: given a store, an item, a target year/month and a mean price
//! scenario, it derives the full feature row the pipeline expects and returns
//! the predicted unit sales. There is no training here: the dataset and the
//! four fitted artifacts are loaded read-only at startup and treated as
//! opaque.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_forecast::predict::{PredictionRequest, SalesPredictor};
//!
//! # fn main() -> sales_forecast::error::Result<()> {
//! // Load the historical dataset and the four pretrained artifacts
//! let predictor = SalesPredictor::load("data/sales_history.parquet", "models")?;
//!
//! // Describe a pricing scenario
//! let request = PredictionRequest::new("S001", "I042", 2024, 6, 12.99)?;
//!
//! // Predict monthly unit sales
//! let prediction = predictor.predict(&request)?;
//! println!(
//!     "predicted sales: {} (cluster {})",
//!     prediction.sales, prediction.diagnostics.cluster_id
//! );
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod features;
pub mod models;
pub mod predict;

// Re-export commonly used types
pub use crate::data::{DataLoader, SalesHistory};
pub use crate::error::ForecastError;
pub use crate::features::{derive_time_features, FeatureRow, TimeAnchor, TimeFeatures};
pub use crate::models::ModelSet;
pub use crate::predict::{Prediction, PredictionRequest, SalesPredictor};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
