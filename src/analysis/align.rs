//! Event-to-market alignment.
//!
//! Matches each news event to the earliest market observation at or after the
//! event timestamp, within a bounded tolerance, and reads a scalar reaction
//! off the matched point. The join is an explicit two-pointer sweep over the
//! two independently sorted sequences; it never matches backward in time.

use crate::data::NewsEvent;
use crate::error::AnalysisError;
use crate::market::PriceSeries;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How the reaction scalar is read off the matched market point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionMode {
    /// Move from the prior market point into the matched one.
    CloseToClose,
    /// Move from the matched market point to the one after it.
    #[default]
    CloseToNext,
}

/// Alignment parameters.
#[derive(Debug, Clone)]
pub struct AlignConfig {
    /// Reaction definition.
    pub mode: ReactionMode,
    /// Maximum gap between an event and its matched market point.
    pub tolerance: Duration,
    /// Attribute every aligned event must carry; events missing it are
    /// dropped so later stages never see a hole where text is expected.
    pub required_attribute: Option<String>,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            mode: ReactionMode::CloseToNext,
            tolerance: Duration::days(crate::defaults::TOLERANCE_DAYS),
            required_attribute: Some(crate::defaults::TEXT_ATTRIBUTE.to_string()),
        }
    }
}

/// A news event joined with its market reaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedEvent {
    /// The original event with all pass-through attributes.
    pub event: NewsEvent,
    /// Timestamp of the matched market point.
    pub matched_at: DateTime<Utc>,
    /// Reaction scalar under the configured [`ReactionMode`].
    pub reaction: f64,
}

/// Align events to the prepared market series.
///
/// Each event maps to at most one market point; events with no forward match
/// inside the tolerance, or missing the required attribute, are dropped from
/// the result. Output order is ascending by event timestamp. The match is a
/// pure function of the inputs and the tolerance.
pub fn align(
    events: &[NewsEvent],
    market: &PriceSeries,
    config: &AlignConfig,
) -> Result<Vec<AlignedEvent>, AnalysisError> {
    if config.tolerance <= Duration::zero() {
        return Err(AnalysisError::InvalidArgument(
            "tolerance must be positive".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by_key(|&i| events[i].timestamp);

    let points = market.points();
    let mut aligned = Vec::new();
    let mut cursor = 0usize;

    for &index in &order {
        let event = &events[index];
        if let Some(name) = &config.required_attribute {
            if !event.attributes.contains_key(name) {
                continue;
            }
        }

        // Events are visited in ascending timestamp order, so the candidate
        // index only ever moves forward.
        while cursor < points.len() && points[cursor].timestamp < event.timestamp {
            cursor += 1;
        }
        let Some(point) = points.get(cursor) else {
            continue;
        };
        if point.timestamp - event.timestamp > config.tolerance {
            continue;
        }

        let reaction = match config.mode {
            ReactionMode::CloseToClose => point.ret,
            ReactionMode::CloseToNext => point.future_return,
        };
        aligned.push(AlignedEvent {
            event: event.clone(),
            matched_at: point.timestamp,
            reaction,
        });
    }

    Ok(aligned)
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

    fn make_event(timestamp: &str) -> NewsEvent {
        NewsEvent::new(parse_timestamp(timestamp).unwrap()).with_attr("clean_text", "headline")
    }

    fn scenario_market() -> PriceSeries {
        make_market(&[
            ("2024-01-01 09:30", 100.0),
            ("2024-01-01 16:00", 102.0),
            ("2024-01-02 16:00", 101.0),
        ])
    }

    #[test]
    fn test_close_to_next_scenario() {
        let market = scenario_market();
        let events = vec![make_event("2024-01-01 10:00"), make_event("2024-01-02 11:00")];

        let aligned = align(&events, &market, &AlignConfig::default()).unwrap();
        assert_eq!(aligned.len(), 2);

        // First event matches the 16:00 close; reaction is the move out of it.
        assert!((aligned[0].reaction - (101.0 - 102.0) / 102.0).abs() < 1e-9);
        // Second event matches the final point, whose future return is 0.
        assert_eq!(aligned[1].reaction, 0.0);
    }

    #[test]
    fn test_close_to_close_uses_matched_return() {
        let market = scenario_market();
        let events = vec![make_event("2024-01-01 10:00")];
        let config = AlignConfig {
            mode: ReactionMode::CloseToClose,
            ..AlignConfig::default()
        };

        let aligned = align(&events, &market, &config).unwrap();
        assert!((aligned[0].reaction - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_never_matches_backward() {
        let market = scenario_market();
        let events = vec![make_event("2024-01-03 00:00")];

        let aligned = align(&events, &market, &AlignConfig::default()).unwrap();
        assert!(aligned.is_empty());
    }

    #[test]
    fn test_tolerance_drops_distant_events() {
        let market = scenario_market();
        let events = vec![make_event("2023-12-25 00:00")];
        let config = AlignConfig {
            tolerance: Duration::days(2),
            ..AlignConfig::default()
        };

        let aligned = align(&events, &market, &config).unwrap();
        assert!(aligned.is_empty());
    }

    #[test]
    fn test_tolerance_monotonicity() {
        let market = scenario_market();
        let events = vec![
            make_event("2023-12-31 17:00"),
            make_event("2024-01-01 10:00"),
            make_event("2024-01-02 15:00"),
        ];

        let narrow = align(
            &events,
            &market,
            &AlignConfig {
                tolerance: Duration::hours(2),
                ..AlignConfig::default()
            },
        )
        .unwrap();
        let wide = align(
            &events,
            &market,
            &AlignConfig {
                tolerance: Duration::days(2),
                ..AlignConfig::default()
            },
        )
        .unwrap();

        assert!(wide.len() >= narrow.len());
        for event in &narrow {
            assert!(wide
                .iter()
                .any(|other| other.event.timestamp == event.event.timestamp));
        }
    }

    #[test]
    fn test_missing_required_attribute_drops_event() {
        let market = scenario_market();
        let bare = NewsEvent::new(parse_timestamp("2024-01-01 10:00").unwrap());

        let aligned = align(&[bare], &market, &AlignConfig::default()).unwrap();
        assert!(aligned.is_empty());
    }

    #[test]
    fn test_unsorted_events_produce_sorted_output() {
        let market = scenario_market();
        let events = vec![make_event("2024-01-02 11:00"), make_event("2024-01-01 10:00")];

        let aligned = align(&events, &market, &AlignConfig::default()).unwrap();
        assert_eq!(aligned.len(), 2);
        assert!(aligned[0].event.timestamp < aligned[1].event.timestamp);
    }

    #[test]
    fn test_non_positive_tolerance_is_invalid() {
        let market = scenario_market();
        let config = AlignConfig {
            tolerance: Duration::zero(),
            ..AlignConfig::default()
        };
        let err = align(&[], &market, &config).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidArgument(_)));
    }

    #[test]
    fn test_event_exactly_on_market_point_matches_it() {
        let market = scenario_market();
        let events = vec![make_event("2024-01-01 16:00")];

        let aligned = align(&events, &market, &AlignConfig::default()).unwrap();
        assert_eq!(aligned.len(), 1);
        assert_eq!(
            aligned[0].matched_at,
            parse_timestamp("2024-01-01 16:00").unwrap()
        );
    }
}
