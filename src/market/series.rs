//! Price series preparation.
//!
//! Turns raw, possibly unordered price rows into a sorted series with per-row
//! simple returns and forward-looking next-period returns.

use crate::data::parse_timestamp;
use crate::error::AnalysisError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Untyped market row as it arrives from a CSV or an upstream loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPricePoint {
    /// Observation timestamp, unparsed.
    pub timestamp: String,
    /// Closing price. `None` when the cell (or the whole column) is missing.
    #[serde(default)]
    pub close: Option<f64>,
    /// Traded volume, optional and unused by the analysis core.
    #[serde(default)]
    pub volume: Option<f64>,
}

/// A single prepared market observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation timestamp.
    pub timestamp: DateTime<Utc>,
    /// Closing price.
    pub close: f64,
    /// Traded volume (0 when absent from the input).
    pub volume: f64,
    /// Simple return from the previous observation.
    ///
    /// 0 for the first row and whenever the previous close is 0. The zero
    /// fill conflates "no move" with "no data"; kept for compatibility with
    /// the upstream pipeline.
    pub ret: f64,
    /// Return from this observation to the next one; 0 for the last row.
    pub future_return: f64,
}

/// Prepared market series, sorted ascending by timestamp.
///
/// Built once per dataset and immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// The prepared observations, ascending by timestamp.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Prepare a raw price series for alignment and aggregation.
///
/// Rows with unparsable timestamps or missing close cells are dropped
/// softly. A non-empty input with no close value at all means the close
/// column itself is absent and fails with [`AnalysisError::Schema`].
pub fn prepare_market(rows: &[RawPricePoint]) -> Result<PriceSeries, AnalysisError> {
    if !rows.is_empty() && rows.iter().all(|row| row.close.is_none()) {
        return Err(AnalysisError::Schema("close".to_string()));
    }

    let mut observations: Vec<(DateTime<Utc>, f64, f64)> = rows
        .iter()
        .filter_map(|row| {
            let timestamp = parse_timestamp(&row.timestamp)?;
            let close = row.close?;
            Some((timestamp, close, row.volume.unwrap_or(0.0)))
        })
        .collect();
    observations.sort_by_key(|(timestamp, _, _)| *timestamp);

    let returns: Vec<f64> = observations
        .iter()
        .enumerate()
        .map(|(i, &(_, close, _))| {
            if i == 0 {
                0.0
            } else {
                pct_change(observations[i - 1].1, close)
            }
        })
        .collect();

    let points = observations
        .iter()
        .enumerate()
        .map(|(i, &(timestamp, close, volume))| PricePoint {
            timestamp,
            close,
            volume,
            ret: returns[i],
            future_return: returns.get(i + 1).copied().unwrap_or(0.0),
        })
        .collect();

    Ok(PriceSeries { points })
}

fn pct_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous
    }
}
