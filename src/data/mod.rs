//! News data loading, cleaning, and event types.

pub mod loader;
pub mod news;
pub mod preprocess;

pub use loader::{load_market, load_news};
pub use news::{AttrValue, NewsEvent};
pub use preprocess::{clean_news, seed_sentiment, NewsPreprocessor, RawNewsItem};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Timestamp formats accepted across news and market inputs.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp string leniently, returning `None` when no known
/// format matches. Callers drop unparsable rows rather than failing.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_datetime_with_seconds() {
        let ts = parse_timestamp("2024-01-01 09:30:00").unwrap();
        assert_eq!(ts.hour(), 9);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_parse_datetime_without_seconds() {
        assert!(parse_timestamp("2024-01-01 10:00").is_some());
        assert!(parse_timestamp("2024-01-01T10:00").is_some());
    }

    #[test]
    fn test_parse_date_only() {
        let ts = parse_timestamp("2024-01-02").unwrap();
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_parse_rfc3339() {
        assert!(parse_timestamp("2024-01-01T10:00:00Z").is_some());
    }

    #[test]
    fn test_parse_garbage_returns_none() {
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
