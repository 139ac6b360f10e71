//! Time feature derivation and the model-facing feature row
//!
//! The regression pipeline was fit on a fixed 12-column schema. Everything in
//! this module exists to reproduce that schema exactly: a continuous month
//! counter extrapolated from the end of the historical range, the cyclical
//! month encoding, and the named feature row the preprocessing transform
//! consumes.

use std::f64::consts::PI;

/// Last observed point of the historical dataset, used to extrapolate the
/// time index for future (or past) targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAnchor {
    /// Maximum observed calendar year
    pub year: i32,
    /// Maximum observed month number
    pub month: u32,
    /// Maximum observed time index
    pub time_index: i64,
}

/// Derived time features for a target year/month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeFeatures {
    /// Continuous month counter, anchored to the end of the history
    pub time_index: i64,
    /// sin(2*pi*month/12)
    pub month_sin: f64,
    /// cos(2*pi*month/12)
    pub month_cos: f64,
}

/// Derive the time index and cyclical month encoding for a target period.
///
/// The time index extends the dataset's counter by the number of months
/// between the anchor and the target. Targets before the anchor produce a
/// smaller (possibly negative) index; extrapolation in either direction is
/// deliberate and never rejected.
pub fn derive_time_features(year: i32, month: u32, anchor: &TimeAnchor) -> TimeFeatures {
    let months_ahead =
        (year as i64 - anchor.year as i64) * 12 + (month as i64 - anchor.month as i64);

    let angle = 2.0 * PI * month as f64 / 12.0;

    TimeFeatures {
        time_index: anchor.time_index + months_ahead,
        month_sin: angle.sin(),
        month_cos: angle.cos(),
    }
}

/// One value of a feature row: numeric, or a categorical label
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    /// A numeric feature
    Number(f64),
    /// A categorical level
    Label(&'a str),
}

/// The full feature row the regression pipeline expects.
///
/// Field set and order must match what the preprocessing transform was fit
/// on; the transform looks values up by column name and treats any missing
/// name as a fatal schema mismatch.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub store_code: String,
    pub item: String,
    pub mean_price: f64,
    pub year: i32,
    pub month: u32,
    pub time_index: i64,
    pub month_sin: f64,
    pub month_cos: f64,
    pub cluster_id: i64,
    pub item_mean_sales: f64,
    pub store_mean_sales: f64,
    pub store_item_mean_sales: f64,
}

impl FeatureRow {
    /// Column names in the order the pipeline was fit on
    pub const COLUMNS: [&'static str; 12] = [
        "store_code",
        "item",
        "mean_price",
        "year",
        "month",
        "time_index",
        "month_sin",
        "month_cos",
        "cluster_id",
        "item_mean_sales",
        "store_mean_sales",
        "store_item_mean_sales",
    ];

    /// Look up a feature value by column name
    pub fn value(&self, column: &str) -> Option<FeatureValue<'_>> {
        let value = match column {
            "store_code" => FeatureValue::Label(&self.store_code),
            "item" => FeatureValue::Label(&self.item),
            "mean_price" => FeatureValue::Number(self.mean_price),
            "year" => FeatureValue::Number(self.year as f64),
            "month" => FeatureValue::Number(self.month as f64),
            "time_index" => FeatureValue::Number(self.time_index as f64),
            "month_sin" => FeatureValue::Number(self.month_sin),
            "month_cos" => FeatureValue::Number(self.month_cos),
            "cluster_id" => FeatureValue::Number(self.cluster_id as f64),
            "item_mean_sales" => FeatureValue::Number(self.item_mean_sales),
            "store_mean_sales" => FeatureValue::Number(self.store_mean_sales),
            "store_item_mean_sales" => FeatureValue::Number(self.store_item_mean_sales),
            _ => return None,
        };

        Some(value)
    }
}
