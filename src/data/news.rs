//! News event types.
//!
//! Events carry an ordered attribute map so the pipeline can pass through
//! whatever upstream stages attach (cleaned text, seed labels, model
//! probabilities) without static schema coupling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute value attached to a news event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Numeric attribute (labels, probabilities, engineered features).
    Number(f64),
    /// Text attribute (headlines, cleaned text, source names).
    Text(String),
}

impl AttrValue {
    /// Numeric view of this attribute, if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(value) => Some(*value),
            AttrValue::Text(_) => None,
        }
    }

    /// Text view of this attribute, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(value) => Some(value),
            AttrValue::Number(_) => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// A discrete, irregularly-timed news event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsEvent {
    /// Publication timestamp.
    pub timestamp: DateTime<Utc>,
    /// Pass-through attributes attached by upstream stages.
    pub attributes: BTreeMap<String, AttrValue>,
}

impl NewsEvent {
    /// Create an event with no attributes.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an attribute (builder style).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attach or replace an attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Text attribute by name.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(AttrValue::as_text)
    }

    /// Numeric attribute by name.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(AttrValue::as_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_attaches_attributes() {
        let event = NewsEvent::new(Utc::now())
            .with_attr("clean_text", "record profit")
            .with_attr("sentiment_seed", 1.0);

        assert_eq!(event.text("clean_text"), Some("record profit"));
        assert_eq!(event.number("sentiment_seed"), Some(1.0));
    }

    #[test]
    fn test_type_mismatch_yields_none() {
        let event = NewsEvent::new(Utc::now()).with_attr("clean_text", "hello");
        assert_eq!(event.number("clean_text"), None);
        assert_eq!(event.text("missing"), None);
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut event = NewsEvent::new(Utc::now()).with_attr("score", 0.1);
        event.set_attr("score", 0.9);
        assert_eq!(event.number("score"), Some(0.9));
    }
}
