//! Event-study aggregation.
//!
//! Extracts a window of per-period returns around each event timestamp,
//! re-indexes every window onto whole-day offsets from its own event, and
//! aggregates across events into average and cumulative abnormal-return
//! curves. Windows with unequal calendar coverage are expected; each offset
//! is averaged over the events that actually have data there.

use crate::error::AnalysisError;
use crate::market::PriceSeries;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated event-study curves, keyed by whole-day offset from the event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventStudyResult {
    /// Mean return at each offset, over the events with data at that offset.
    pub avg_abnormal_return: BTreeMap<i64, f64>,
    /// Running sum of the mean returns over ascending offsets.
    pub cumulative_abnormal_return: BTreeMap<i64, f64>,
}

impl EventStudyResult {
    /// Whether no event contributed any window data.
    pub fn is_empty(&self) -> bool {
        self.avg_abnormal_return.is_empty()
    }
}

/// Aggregate market returns around the given event timestamps.
///
/// For each event, every market point within `window_days` calendar days on
/// either side (inclusive) contributes its return at the offset
/// `point.timestamp - event.timestamp` truncated to whole days. Events with
/// no points in range contribute nothing. An empty result is returned when
/// no event has any coverage.
pub fn aggregate(
    event_times: &[DateTime<Utc>],
    market: &PriceSeries,
    window_days: i64,
) -> Result<EventStudyResult, AnalysisError> {
    if window_days <= 0 {
        return Err(AnalysisError::InvalidArgument(
            "window must be positive".to_string(),
        ));
    }

    let half_window = Duration::days(window_days);
    let points = market.points();
    let mut sums: BTreeMap<i64, (f64, usize)> = BTreeMap::new();

    for &event_time in event_times {
        let start = event_time - half_window;
        let end = event_time + half_window;

        let begin = points.partition_point(|point| point.timestamp < start);
        for point in &points[begin..] {
            if point.timestamp > end {
                break;
            }
            let offset = (point.timestamp - event_time).num_days();
            let entry = sums.entry(offset).or_insert((0.0, 0));
            entry.0 += point.ret;
            entry.1 += 1;
        }
    }

    let mut avg_abnormal_return = BTreeMap::new();
    let mut cumulative_abnormal_return = BTreeMap::new();
    let mut running = 0.0;
    for (offset, (sum, count)) in sums {
        let mean = sum / count as f64;
        running += mean;
        avg_abnormal_return.insert(offset, mean);
        cumulative_abnormal_return.insert(offset, running);
    }

    Ok(EventStudyResult {
        avg_abnormal_return,
        cumulative_abnormal_return,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_timestamp;
    use crate::market::{prepare_market, RawPricePoint};

    fn make_market(rows: &[(&str, f64)]) -> PriceSeries {
        let raw: Vec<RawPricePoint> = rows
            .iter()
            .map(|(timestamp, close)| RawPricePoint {
                timestamp: timestamp.to_string(),
                close: Some(*close),
                volume: None,
            })
            .collect();
        prepare_market(&raw).unwrap()
    }

    #[test]
    fn test_single_point_at_offset_zero() {
        let market = make_market(&[("2024-01-05 12:00", 100.0)]);
        let events = vec![parse_timestamp("2024-01-05 12:00").unwrap()];

        let result = aggregate(&events, &market, 3).unwrap();
        assert_eq!(result.avg_abnormal_return.len(), 1);
        assert_eq!(result.avg_abnormal_return[&0], 0.0);
        assert_eq!(result.cumulative_abnormal_return[&0], 0.0);
    }

    #[test]
    fn test_offsets_cover_both_sides_of_event() {
        let market = make_market(&[
            ("2024-01-03 12:00", 100.0),
            ("2024-01-04 12:00", 101.0),
            ("2024-01-05 12:00", 103.0),
            ("2024-01-06 12:00", 102.0),
        ]);
        let events = vec![parse_timestamp("2024-01-05 12:00").unwrap()];

        let result = aggregate(&events, &market, 3).unwrap();
        let offsets: Vec<i64> = result.avg_abnormal_return.keys().copied().collect();
        assert_eq!(offsets, vec![-2, -1, 0, 1]);
        assert!((result.avg_abnormal_return[&-1] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_is_running_sum() {
        let market = make_market(&[
            ("2024-01-04 12:00", 100.0),
            ("2024-01-05 12:00", 102.0),
            ("2024-01-06 12:00", 104.04),
        ]);
        let events = vec![parse_timestamp("2024-01-05 12:00").unwrap()];

        let result = aggregate(&events, &market, 3).unwrap();
        let avg = &result.avg_abnormal_return;
        let car = &result.cumulative_abnormal_return;

        let mut running = 0.0;
        for (offset, mean) in avg {
            running += mean;
            assert!((car[offset] - running).abs() < 1e-12);
        }
        // The sum starts from the smallest present offset, not offset 0.
        assert_eq!(car[&-1], avg[&-1]);
    }

    #[test]
    fn test_unequal_support_averages_present_values_only() {
        // Two events one day apart; only the second has data at offset -1.
        let market = make_market(&[
            ("2024-01-05 12:00", 100.0),
            ("2024-01-06 12:00", 110.0),
        ]);
        let events = vec![
            parse_timestamp("2024-01-05 12:00").unwrap(),
            parse_timestamp("2024-01-06 12:00").unwrap(),
        ];

        let result = aggregate(&events, &market, 1).unwrap();
        // Offset 0: first event sees ret 0.0, second sees ret 0.1.
        assert!((result.avg_abnormal_return[&0] - 0.05).abs() < 1e-12);
        // Offset -1: only the second event contributes (ret 0.0).
        assert_eq!(result.avg_abnormal_return[&-1], 0.0);
        // Offset 1: only the first event contributes (ret 0.1).
        assert!((result.avg_abnormal_return[&1] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_events_without_coverage_are_skipped() {
        let market = make_market(&[("2024-01-05 12:00", 100.0)]);
        let events = vec![parse_timestamp("2024-06-01 00:00").unwrap()];

        let result = aggregate(&events, &market, 3).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_no_events_returns_empty_result() {
        let market = make_market(&[("2024-01-05 12:00", 100.0)]);
        let result = aggregate(&[], &market, 3).unwrap();
        assert!(result.is_empty());
        assert!(result.cumulative_abnormal_return.is_empty());
    }

    #[test]
    fn test_non_positive_window_is_invalid() {
        let market = make_market(&[("2024-01-05 12:00", 100.0)]);
        let err = aggregate(&[], &market, 0).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidArgument(_)));
    }
}
