//! Historical sales dataset handling
//!
//! The reference dataset is produced by the training pipeline and loaded
//! read-only, once, at process start. Besides raw access it provides the
//! aggregate lookups the feature row needs (per-item, per-store and
//! per-store-item mean sales) and the time anchor used to extrapolate the
//! time index.

use crate::error::{ForecastError, Result};
use crate::features::TimeAnchor;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Columns the dataset must carry. The derived feature columns are part of
/// the dataset-build contract even though predictions recompute them, so
/// their absence is treated as a broken dataset.
const REQUIRED_COLUMNS: [&str; 13] = [
    "year_month",
    "item",
    "store_code",
    "region",
    "sales",
    "mean_price",
    "time_index",
    "month_sin",
    "month_cos",
    "item_mean_sales",
    "store_mean_sales",
    "store_item_mean_sales",
    "cluster_id",
];

/// Columns that must not contain nulls for predictions to be meaningful
const CRITICAL_COLUMNS: [&str; 6] = [
    "year_month",
    "item",
    "store_code",
    "sales",
    "mean_price",
    "cluster_id",
];

/// Data loader for the historical sales dataset
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load the dataset from a parquet file
    pub fn from_parquet<P: AsRef<Path>>(path: P) -> Result<SalesHistory> {
        let file = File::open(path)?;
        let df = ParquetReader::new(file).finish()?;

        SalesHistory::from_dataframe(df)
    }

    /// Load the dataset from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesHistory> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        SalesHistory::from_dataframe(df)
    }
}

/// The historical sales dataset, decoded for aggregate lookups
#[derive(Debug, Clone)]
pub struct SalesHistory {
    /// Data frame containing the raw dataset
    df: DataFrame,
    store_codes: Vec<String>,
    items: Vec<String>,
    sales: Vec<f64>,
    mean_prices: Vec<f64>,
    years: Vec<i32>,
    months: Vec<u32>,
    time_indexes: Vec<i64>,
}

impl SalesHistory {
    /// Validate and decode an existing DataFrame into a SalesHistory
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        if df.height() == 0 {
            return Err(ForecastError::DataError(
                "Historical dataset is empty".to_string(),
            ));
        }

        let column_names = df.get_column_names();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !column_names.contains(name))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(ForecastError::DataError(format!(
                "Historical dataset is missing required columns: {}",
                missing.join(", ")
            )));
        }

        for name in CRITICAL_COLUMNS {
            if df.column(name)?.null_count() > 0 {
                return Err(ForecastError::DataError(format!(
                    "Null values found in critical column '{}'",
                    name
                )));
            }
        }

        let store_codes = column_as_string(&df, "store_code")?;
        let items = column_as_string(&df, "item")?;
        let sales = column_as_f64(&df, "sales")?;
        let mean_prices = column_as_f64(&df, "mean_price")?;
        let time_indexes = column_as_i64(&df, "time_index")?;
        let (years, months) = decode_periods(&df)?;

        Ok(Self {
            df,
            store_codes,
            items,
            sales,
            mean_prices,
            years,
            months,
            time_indexes,
        })
    }

    /// Get the underlying DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the number of historical records
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check if the dataset is empty (never true after construction)
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Sorted unique store codes
    pub fn stores(&self) -> Vec<String> {
        sorted_unique(&self.store_codes)
    }

    /// Sorted unique item identifiers
    pub fn items(&self) -> Vec<String> {
        sorted_unique(&self.items)
    }

    /// Last observed year, month and time index, used as the extrapolation
    /// anchor. Each value is the maximum of its own column, matching how the
    /// dataset's time index was built.
    pub fn anchor(&self) -> TimeAnchor {
        TimeAnchor {
            year: self.years.iter().copied().max().unwrap_or(0),
            month: self.months.iter().copied().max().unwrap_or(1),
            time_index: self.time_indexes.iter().copied().max().unwrap_or(0),
        }
    }

    /// Selectable forecast years: the historical range extended two years
    /// beyond the last observed year
    pub fn forecast_years(&self) -> Vec<i32> {
        let min_year = self.years.iter().copied().min().unwrap_or(0);
        let max_year = self.years.iter().copied().max().unwrap_or(0);

        (min_year..=max_year + 2).collect()
    }

    /// Last observed historical year, the default forecast target
    pub fn last_year(&self) -> i32 {
        self.years.iter().copied().max().unwrap_or(0)
    }

    /// Mean sales over the entire dataset
    pub fn global_mean_sales(&self) -> f64 {
        mean(&self.sales)
    }

    /// Mean sales of an item across all stores, falling back to the global
    /// mean when the item has no history
    pub fn item_mean_sales(&self, item: &str) -> f64 {
        self.mean_sales_where(|i| self.items[i] == item)
    }

    /// Mean sales of a store across all items, falling back to the global
    /// mean when the store has no history
    pub fn store_mean_sales(&self, store: &str) -> f64 {
        self.mean_sales_where(|i| self.store_codes[i] == store)
    }

    /// Mean sales of a store+item pair, falling back to the global mean when
    /// the pair has no history
    pub fn store_item_mean_sales(&self, store: &str, item: &str) -> f64 {
        self.mean_sales_where(|i| self.store_codes[i] == store && self.items[i] == item)
    }

    /// Historical mean price for a store+item pair, falling back to the
    /// dataset-wide mean price. Drives the suggested default in the price
    /// input.
    pub fn suggested_mean_price(&self, store: &str, item: &str) -> f64 {
        let selected: Vec<f64> = (0..self.mean_prices.len())
            .filter(|&i| self.store_codes[i] == store && self.items[i] == item)
            .map(|i| self.mean_prices[i])
            .collect();

        if selected.is_empty() {
            mean(&self.mean_prices)
        } else {
            mean(&selected)
        }
    }

    /// Mean of the sales column over rows matching the predicate. An empty
    /// slice silently degrades to the global mean rather than failing, so
    /// unseen store/item combinations still predict.
    fn mean_sales_where<F: Fn(usize) -> bool>(&self, keep: F) -> f64 {
        let selected: Vec<f64> = (0..self.sales.len())
            .filter(|&i| keep(i))
            .map(|i| self.sales[i])
            .collect();

        if selected.is_empty() {
            mean(&self.sales)
        } else {
            mean(&selected)
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sorted_unique(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = values.to_vec();
    out.sort();
    out.dedup();
    out
}

/// Decode target periods, preferring explicit year/month columns and falling
/// back to parsing the `year_month` strings ("YYYY-MM")
fn decode_periods(df: &DataFrame) -> Result<(Vec<i32>, Vec<u32>)> {
    let column_names = df.get_column_names();
    if column_names.contains(&"year") && column_names.contains(&"month") {
        let years = column_as_i64(df, "year")?
            .into_iter()
            .map(|y| y as i32)
            .collect();
        let months = column_as_i64(df, "month")?
            .into_iter()
            .map(|m| m as u32)
            .collect();
        return Ok((years, months));
    }

    let mut years = Vec::with_capacity(df.height());
    let mut months = Vec::with_capacity(df.height());
    for raw in column_as_string(df, "year_month")? {
        let (year, month) = parse_year_month(&raw)?;
        years.push(year);
        months.push(month);
    }

    Ok((years, months))
}

fn parse_year_month(raw: &str) -> Result<(i32, u32)> {
    let mut parts = raw.split('-');
    let year = parts.next().and_then(|p| p.parse::<i32>().ok());
    let month = parts.next().and_then(|p| p.parse::<u32>().ok());

    // Exactly "YYYY-MM"; a trailing component means the value is not a period
    match (year, month, parts.next()) {
        (Some(year), Some(month), None) if (1..=12).contains(&month) => Ok((year, month)),
        _ => Err(ForecastError::DataError(format!(
            "Cannot parse year_month value '{}'",
            raw
        ))),
    }
}

/// Get a column as f64 values
fn column_as_f64(df: &DataFrame, column_name: &str) -> Result<Vec<f64>> {
    let col = df.column(column_name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
    })?;

    match col.dtype() {
        DataType::Float64 => Ok(col.f64().unwrap().into_iter().flatten().collect()),
        DataType::Float32 => Ok(col
            .f32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::Int64 => Ok(col
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::Int32 => Ok(col
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::UInt64 => Ok(col
            .u64()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::UInt32 => Ok(col
            .u32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        _ => Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to f64",
            column_name
        ))),
    }
}

/// Get a column as i64 values
fn column_as_i64(df: &DataFrame, column_name: &str) -> Result<Vec<i64>> {
    let col = df.column(column_name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
    })?;

    match col.dtype() {
        DataType::Int64 => Ok(col.i64().unwrap().into_iter().flatten().collect()),
        DataType::Int32 => Ok(col
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as i64)
            .collect()),
        DataType::UInt64 => Ok(col
            .u64()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as i64)
            .collect()),
        DataType::UInt32 => Ok(col
            .u32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as i64)
            .collect()),
        DataType::Float64 => Ok(col
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as i64)
            .collect()),
        _ => Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to i64",
            column_name
        ))),
    }
}

/// Get a column as string values; integer identifier columns are formatted
fn column_as_string(df: &DataFrame, column_name: &str) -> Result<Vec<String>> {
    let col = df.column(column_name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
    })?;

    match col.dtype() {
        DataType::Utf8 => Ok(col
            .utf8()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v.to_string())
            .collect()),
        DataType::Int64 => Ok(col
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v.to_string())
            .collect()),
        DataType::Int32 => Ok(col
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v.to_string())
            .collect()),
        _ => Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to string",
            column_name
        ))),
    }
}
