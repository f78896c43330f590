//! News cleaning and heuristic seed labeling.
//!
//! Normalizes headlines into a `clean_text` attribute and attaches a keyword
//! based `sentiment_seed` label in {-1, 0, 1}. The seed labels bootstrap the
//! sentiment model; they are not meant to be accurate on their own.

use crate::data::{parse_timestamp, NewsEvent};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tokens counted as positive by the seed labeler.
const POSITIVE_TOKENS: &[&str] = &["beat", "growth", "record", "surge", "profit"];

/// Tokens counted as negative by the seed labeler.
const NEGATIVE_TOKENS: &[&str] = &["miss", "loss", "slow", "fraud", "decline"];

/// Raw news row as it arrives from a CSV or an upstream loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNewsItem {
    /// Publication timestamp, unparsed.
    pub timestamp: String,
    /// Headline text.
    pub headline: String,
    /// Optional source name.
    #[serde(default)]
    pub source: Option<String>,
}

/// Text normalizer for news headlines.
pub struct NewsPreprocessor {
    symbol_regex: Regex,
    whitespace_regex: Regex,
    positive_tokens: HashSet<&'static str>,
    negative_tokens: HashSet<&'static str>,
}

impl Default for NewsPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl NewsPreprocessor {
    /// Create a preprocessor with the default keyword sets.
    pub fn new() -> Self {
        Self {
            symbol_regex: Regex::new(r"[^A-Za-z0-9 ]+").expect("valid regex"),
            whitespace_regex: Regex::new(r"\s+").expect("valid regex"),
            positive_tokens: POSITIVE_TOKENS.iter().copied().collect(),
            negative_tokens: NEGATIVE_TOKENS.iter().copied().collect(),
        }
    }

    /// Lowercase, strip non-alphanumerics, and collapse whitespace.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = self.symbol_regex.replace_all(lowered.trim(), " ");
        let collapsed = self.whitespace_regex.replace_all(&stripped, " ");
        collapsed.trim().to_string()
    }

    /// Keyword-count seed label: 1 positive, -1 negative, 0 neutral/tied.
    pub fn seed_label(&self, clean_text: &str) -> i64 {
        let tokens: HashSet<&str> = clean_text.split_whitespace().collect();
        let positive = tokens
            .iter()
            .filter(|t| self.positive_tokens.contains(*t))
            .count();
        let negative = tokens
            .iter()
            .filter(|t| self.negative_tokens.contains(*t))
            .count();

        if positive > negative {
            1
        } else if negative > positive {
            -1
        } else {
            0
        }
    }
}

/// Clean raw news rows into timestamped events sorted ascending.
///
/// Rows with unparsable timestamps or empty headlines are dropped, and
/// duplicate headlines keep only their first occurrence. Each surviving
/// event carries `headline`, `clean_text`, and `source` (when present).
pub fn clean_news(rows: &[RawNewsItem]) -> Vec<NewsEvent> {
    let preprocessor = NewsPreprocessor::new();
    let mut seen_headlines: HashSet<String> = HashSet::new();
    let mut events = Vec::new();

    for row in rows {
        let Some(timestamp) = parse_timestamp(&row.timestamp) else {
            continue;
        };
        let headline = row.headline.trim();
        if headline.is_empty() || !seen_headlines.insert(headline.to_string()) {
            continue;
        }

        let mut event = NewsEvent::new(timestamp)
            .with_attr("headline", headline)
            .with_attr("clean_text", preprocessor.normalize(headline));
        if let Some(source) = &row.source {
            event.set_attr("source", source.as_str());
        }
        events.push(event);
    }

    events.sort_by_key(|event| event.timestamp);
    events
}

/// Attach the keyword seed label to every event as `sentiment_seed`.
///
/// Events without a `clean_text` attribute get the neutral label.
pub fn seed_sentiment(events: &mut [NewsEvent]) {
    let preprocessor = NewsPreprocessor::new();
    for event in events.iter_mut() {
        let label = event
            .text("clean_text")
            .map(|text| preprocessor.seed_label(text))
            .unwrap_or(0);
        event.set_attr("sentiment_seed", label as f64);
    }
}
