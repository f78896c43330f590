//! Loading of raw news and market datasets.
//!
//! Reads CSV files with a header row; when a file does not exist a small
//! simulated dataset is generated instead so the pipeline stays runnable
//! without any data on disk.

use crate::data::preprocess::RawNewsItem;
use crate::market::RawPricePoint;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use csv::Reader;
use rand::Rng;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Start date for simulated datasets.
const SIMULATED_START: &str = "2024-01-01";

/// Load news rows from a CSV file, or simulate them when the file is absent.
///
/// Expected columns: `timestamp`, `headline`, and optionally `source`.
pub fn load_news<P: AsRef<Path>>(path: P) -> Result<Vec<RawNewsItem>> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "news file not found, simulating");
        return Ok(simulate_news(10));
    }

    let file =
        File::open(path).with_context(|| format!("failed to open news file: {:?}", path))?;
    let mut reader = Reader::from_reader(file);
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: RawNewsItem = result.context("failed to parse news row")?;
        rows.push(row);
    }
    Ok(rows)
}

/// Load market rows from a CSV file, or simulate them when the file is absent.
///
/// Expected columns: `timestamp`, `close`, and optionally `volume`.
pub fn load_market<P: AsRef<Path>>(path: P) -> Result<Vec<RawPricePoint>> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "market file not found, simulating");
        return Ok(simulate_market(40));
    }

    let file =
        File::open(path).with_context(|| format!("failed to open market file: {:?}", path))?;
    let mut reader = Reader::from_reader(file);
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: RawPricePoint = result.context("failed to parse market row")?;
        rows.push(row);
    }
    Ok(rows)
}

/// Synthetic headlines every six hours.
pub fn simulate_news(rows: usize) -> Vec<RawNewsItem> {
    let start = simulated_start();
    (0..rows)
        .map(|i| RawNewsItem {
            timestamp: (start + Duration::hours(6 * i as i64))
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            headline: format!("Company {} beats expectations", i),
            source: Some("synthetic".to_string()),
        })
        .collect()
}

/// Hourly random-walk close prices around 100.
pub fn simulate_market(rows: usize) -> Vec<RawPricePoint> {
    let start = simulated_start();
    let mut rng = rand::thread_rng();
    let mut price = 100.0_f64;

    (0..rows)
        .map(|i| {
            price += rng.gen_range(-0.5..0.5);
            RawPricePoint {
                timestamp: (start + Duration::hours(i as i64))
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
                close: Some(price),
                volume: Some(rng.gen_range(1_000.0..3_000.0)),
            }
        })
        .collect()
}

fn simulated_start() -> chrono::NaiveDateTime {
    NaiveDate::parse_from_str(SIMULATED_START, "%Y-%m-%d")
        .expect("valid start date")
        .and_hms_opt(0, 0, 0)
        .expect("valid start time")
}
