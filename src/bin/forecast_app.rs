//! Interactive console front end for monthly sales prediction.
//!
//! Loads the historical dataset and the four pretrained artifacts once at
//! startup, then loops: pick a store, an item, a target period and a mean
//! price scenario, and print the predicted unit sales with the diagnostics
//! behind it. Startup failures are fatal before any interaction happens.

use sales_forecast::predict::{PredictionRequest, SalesPredictor, MAX_MEAN_PRICE};
use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

/// Environment override for the dataset path
const DATA_ENV: &str = "SALES_FORECAST_DATA";
/// Environment override for the artifact directory
const MODELS_ENV: &str = "SALES_FORECAST_MODELS";

const DEFAULT_DATA: &str = "data/sales_history.parquet";
const DEFAULT_MODELS: &str = "models";

fn main() -> ExitCode {
    let data_path = env::var(DATA_ENV).unwrap_or_else(|_| DEFAULT_DATA.to_string());
    let models_dir = env::var(MODELS_ENV).unwrap_or_else(|_| DEFAULT_MODELS.to_string());

    let predictor = match SalesPredictor::load(&data_path, &models_dir) {
        Ok(predictor) => predictor,
        Err(e) => {
            eprintln!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Monthly sales prediction ({} records loaded)", predictor.history().len());
    println!("Enter 'q' at any prompt to quit.");
    println!();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        match run_once(&predictor, &mut input) {
            Ok(true) => println!(),
            Ok(false) => break,
            Err(e) => {
                eprintln!("IO error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Run one prediction round. Returns false when the user quits.
fn run_once<R: BufRead>(predictor: &SalesPredictor, input: &mut R) -> io::Result<bool> {
    let history = predictor.history();

    let stores = history.stores();
    let items = history.items();
    let years = history.forecast_years();

    let store = match choose("Store", &stores, input)? {
        Some(store) => store,
        None => return Ok(false),
    };
    let item = match choose("Item", &items, input)? {
        Some(item) => item,
        None => return Ok(false),
    };

    let default_year = history.last_year();
    let year = match prompt_integer("Forecast year", default_year as i64, input)? {
        Some(year) => year as i32,
        None => return Ok(false),
    };
    if !years.contains(&year) {
        println!(
            "Year {} is outside the selectable range {}..{}",
            year,
            years.first().copied().unwrap_or_default(),
            years.last().copied().unwrap_or_default()
        );
        return Ok(true);
    }

    let month = match prompt_integer("Month (1-12)", 1, input)? {
        Some(month) => month as u32,
        None => return Ok(false),
    };

    let default_price = history.suggested_mean_price(&store, &item);
    let price_label = format!("Mean price (0-{})", MAX_MEAN_PRICE);
    let mean_price = match prompt_number(&price_label, default_price, input)? {
        Some(price) => price,
        None => return Ok(false),
    };

    let request = match PredictionRequest::new(&store, &item, year, month, mean_price) {
        Ok(request) => request,
        Err(e) => {
            println!("{}", e);
            return Ok(true);
        }
    };

    match predictor.predict(&request) {
        Ok(prediction) => {
            let d = &prediction.diagnostics;
            println!();
            println!("Predicted sales: {}", prediction.sales);
            println!("  Store:                  {}", store);
            println!("  Item:                   {}", item);
            println!("  Period:                 {}-{:02}", year, month);
            println!("  Mean price considered:  {:.2}", mean_price);
            println!("  Estimated cluster:      {}", d.cluster_id);
            println!("  Item mean sales:        {:.2}", d.item_mean_sales);
            println!("  Store mean sales:       {:.2}", d.store_mean_sales);
            println!("  Store+item mean sales:  {:.2}", d.store_item_mean_sales);
            println!("  Time index:             {}", d.time_index);
            println!("  Raw model value:        {:.2}", prediction.raw);
        }
        Err(e) => println!("Prediction failed: {}", e),
    }

    Ok(true)
}

/// Offer a numbered catalog and read a selection by number or by value
fn choose<R: BufRead>(
    label: &str,
    options: &[String],
    input: &mut R,
) -> io::Result<Option<String>> {
    println!("{} options:", label);
    for (index, option) in options.iter().enumerate() {
        println!("  {:>3}  {}", index + 1, option);
    }

    loop {
        let line = match prompt(label, input)? {
            Some(line) => line,
            None => return Ok(None),
        };

        if let Ok(index) = line.parse::<usize>() {
            if index >= 1 && index <= options.len() {
                return Ok(Some(options[index - 1].clone()));
            }
        }
        if options.contains(&line) {
            return Ok(Some(line));
        }

        println!("Pick a number between 1 and {}, or an exact value.", options.len());
    }
}

/// Read a whole number, keeping the default on empty input. Fractional
/// input is rejected rather than truncated; year and month are discrete
/// selections.
fn prompt_integer<R: BufRead>(
    label: &str,
    default: i64,
    input: &mut R,
) -> io::Result<Option<i64>> {
    loop {
        let full_label = format!("{} [{}]", label, default);
        let line = match prompt(&full_label, input)? {
            Some(line) => line,
            None => return Ok(None),
        };

        if line.is_empty() {
            return Ok(Some(default));
        }
        if let Ok(value) = line.parse::<i64>() {
            return Ok(Some(value));
        }

        println!("Not a whole number: {}", line);
    }
}

/// Read a number, keeping the default on empty input
fn prompt_number<R: BufRead>(
    label: &str,
    default: f64,
    input: &mut R,
) -> io::Result<Option<f64>> {
    loop {
        let full_label = format!("{} [{:.2}]", label, default);
        let line = match prompt(&full_label, input)? {
            Some(line) => line,
            None => return Ok(None),
        };

        if line.is_empty() {
            return Ok(Some(default));
        }
        if let Ok(value) = line.parse::<f64>() {
            return Ok(Some(value));
        }

        println!("Not a number: {}", line);
    }
}

/// Read one trimmed line; None means EOF or an explicit quit
fn prompt<R: BufRead>(label: &str, input: &mut R) -> io::Result<Option<String>> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let line = line.trim().to_string();
    if line == "q" || line == "quit" {
        return Ok(None);
    }

    Ok(Some(line))
}
