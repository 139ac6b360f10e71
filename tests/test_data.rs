use assert_approx_eq::assert_approx_eq;
use sales_forecast::data::{DataLoader, SalesHistory};
use sales_forecast::error::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

fn history_fixture() -> SalesHistory {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "year_month,item,store_code,region,sales,mean_price,time_index,month_sin,month_cos,item_mean_sales,store_mean_sales,store_item_mean_sales,cluster_id"
    )
    .unwrap();
    writeln!(file, "2023-10,I001,S1,north,10,2.0,33,-0.87,0.5,23.33,20.0,15.0,0").unwrap();
    writeln!(file, "2023-11,I001,S1,north,20,2.5,34,-0.5,0.87,23.33,20.0,15.0,1").unwrap();
    writeln!(file, "2023-12,I002,S1,north,30,3.0,35,0.0,1.0,30.0,20.0,30.0,1").unwrap();
    writeln!(file, "2023-12,I001,S2,south,40,4.0,35,0.0,1.0,23.33,40.0,40.0,2").unwrap();

    DataLoader::from_csv(file.path()).unwrap()
}

#[test]
fn loads_catalogs_and_anchor_from_csv() {
    let history = history_fixture();

    assert_eq!(history.len(), 4);
    assert!(!history.is_empty());
    assert_eq!(history.stores(), vec!["S1".to_string(), "S2".to_string()]);
    assert_eq!(history.items(), vec!["I001".to_string(), "I002".to_string()]);

    let anchor = history.anchor();
    assert_eq!(anchor.year, 2023);
    assert_eq!(anchor.month, 12);
    assert_eq!(anchor.time_index, 35);
}

#[test]
fn forecast_years_extend_two_years_past_the_history() {
    let history = history_fixture();

    assert_eq!(history.forecast_years(), vec![2023, 2024, 2025]);
    assert_eq!(history.last_year(), 2023);
}

#[test]
fn mean_sales_aggregates_match_hand_computation() {
    let history = history_fixture();

    assert_approx_eq!(history.item_mean_sales("I001"), (10.0 + 20.0 + 40.0) / 3.0);
    assert_approx_eq!(history.store_mean_sales("S1"), (10.0 + 20.0 + 30.0) / 3.0);
    assert_approx_eq!(history.store_item_mean_sales("S1", "I001"), 15.0);
    assert_approx_eq!(history.global_mean_sales(), 25.0);
}

#[test]
fn empty_slices_fall_back_to_the_global_mean() {
    let history = history_fixture();
    let global = history.global_mean_sales();

    // Store and item both exist, but never together
    assert_approx_eq!(history.store_item_mean_sales("S2", "I002"), global);

    // Entirely unseen identifiers degrade the same way instead of failing
    assert_approx_eq!(history.item_mean_sales("I999"), global);
    assert_approx_eq!(history.store_mean_sales("S999"), global);
}

#[test]
fn suggested_price_prefers_the_pair_history() {
    let history = history_fixture();

    assert_approx_eq!(history.suggested_mean_price("S1", "I001"), 2.25);

    // No history for the pair: dataset-wide mean price
    assert_approx_eq!(
        history.suggested_mean_price("S2", "I002"),
        (2.0 + 2.5 + 3.0 + 4.0) / 4.0
    );
}

#[test]
fn rejects_missing_required_columns() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "year_month,item,store_code,sales,mean_price").unwrap();
    writeln!(file, "2023-10,I001,S1,10,2.0").unwrap();

    let result = DataLoader::from_csv(file.path());
    match result {
        Err(ForecastError::DataError(message)) => {
            assert!(message.contains("region"), "unexpected message: {}", message);
            assert!(message.contains("time_index"), "unexpected message: {}", message);
        }
        other => panic!("expected DataError, got {:?}", other.map(|h| h.len())),
    }
}

#[test]
fn rejects_a_dataset_missing_a_derived_feature_column() {
    // Everything except month_sin; the derived columns are part of the
    // dataset-build contract even though predictions recompute them
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "year_month,item,store_code,region,sales,mean_price,time_index,month_cos,item_mean_sales,store_mean_sales,store_item_mean_sales,cluster_id"
    )
    .unwrap();
    writeln!(file, "2023-10,I001,S1,north,10,2.0,33,0.5,23.33,20.0,15.0,0").unwrap();

    let result = DataLoader::from_csv(file.path());
    match result {
        Err(ForecastError::DataError(message)) => {
            assert!(message.contains("month_sin"), "unexpected message: {}", message);
        }
        other => panic!("expected DataError, got {:?}", other.map(|h| h.len())),
    }
}

#[test]
fn rejects_nulls_in_critical_columns() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "year_month,item,store_code,region,sales,mean_price,time_index,month_sin,month_cos,item_mean_sales,store_mean_sales,store_item_mean_sales,cluster_id"
    )
    .unwrap();
    writeln!(file, "2023-10,I001,S1,north,10,2.0,33,-0.87,0.5,23.33,20.0,15.0,0").unwrap();
    writeln!(file, "2023-11,I001,S1,north,,2.5,34,-0.5,0.87,23.33,20.0,15.0,1").unwrap();

    let result = DataLoader::from_csv(file.path());
    match result {
        Err(ForecastError::DataError(message)) => {
            assert!(message.contains("sales"), "unexpected message: {}", message);
        }
        other => panic!("expected DataError, got {:?}", other.map(|h| h.len())),
    }
}

#[test]
fn rejects_an_empty_dataset() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "year_month,item,store_code,region,sales,mean_price,time_index,month_sin,month_cos,item_mean_sales,store_mean_sales,store_item_mean_sales,cluster_id"
    )
    .unwrap();

    assert!(DataLoader::from_csv(file.path()).is_err());
}

#[test]
fn rejects_unparseable_periods() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "year_month,item,store_code,region,sales,mean_price,time_index,month_sin,month_cos,item_mean_sales,store_mean_sales,store_item_mean_sales,cluster_id"
    )
    .unwrap();
    writeln!(file, "not-a-period,I001,S1,north,10,2.0,33,0.0,1.0,25.0,25.0,25.0,0").unwrap();

    assert!(DataLoader::from_csv(file.path()).is_err());
}

#[test]
fn rejects_a_period_with_a_day_component() {
    // year_month is exactly "YYYY-MM"; a full date is not a period
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "year_month,item,store_code,region,sales,mean_price,time_index,month_sin,month_cos,item_mean_sales,store_mean_sales,store_item_mean_sales,cluster_id"
    )
    .unwrap();
    writeln!(file, "2023-12-15,I001,S1,north,10,2.0,33,0.0,1.0,25.0,25.0,25.0,0").unwrap();

    assert!(DataLoader::from_csv(file.path()).is_err());
}

#[test]
fn missing_file_is_an_error() {
    assert!(DataLoader::from_parquet("no_such_dataset.parquet").is_err());
    assert!(DataLoader::from_csv("no_such_dataset.csv").is_err());
}
