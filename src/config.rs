//! Configuration handling.
//!
//! TOML-backed configuration with defaults for every section, so the
//! pipeline runs without a config file at all.

use crate::analysis::{AlignConfig, ReactionMode};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input/output locations
    pub paths: PathsConfig,
    /// Event-to-market alignment
    pub alignment: AlignmentConfig,
    /// Event-study aggregation
    pub event_study: EventStudyConfig,
    /// Feature/reaction association ranking
    pub correlation: CorrelationConfig,
    /// Sentiment model training
    pub training: TrainingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Dataset and model file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// News CSV (simulated when missing)
    pub news_csv: String,
    /// Market CSV (simulated when missing)
    pub market_csv: String,
    /// Where the fitted sentiment model is written
    pub sentiment_model: String,
    /// Where the fitted reaction model is written
    pub reaction_model: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            news_csv: "data/news.csv".to_string(),
            market_csv: "data/market.csv".to_string(),
            sentiment_model: "models/sentiment.json".to_string(),
            reaction_model: "models/reaction.json".to_string(),
        }
    }
}

/// Alignment parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Reaction definition
    pub reaction_mode: ReactionMode,
    /// Maximum event-to-market gap in days
    pub tolerance_days: i64,
    /// Attribute every aligned event must carry
    pub required_attribute: String,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            reaction_mode: ReactionMode::CloseToNext,
            tolerance_days: crate::defaults::TOLERANCE_DAYS,
            required_attribute: crate::defaults::TEXT_ATTRIBUTE.to_string(),
        }
    }
}

impl AlignmentConfig {
    /// Convert into the alignment call parameters.
    pub fn to_align_config(&self) -> AlignConfig {
        AlignConfig {
            mode: self.reaction_mode,
            tolerance: Duration::days(self.tolerance_days),
            required_attribute: Some(self.required_attribute.clone()),
        }
    }
}

/// Event-study parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventStudyConfig {
    /// Calendar days on each side of an event
    pub window_days: i64,
}

impl Default for EventStudyConfig {
    fn default() -> Self {
        Self {
            window_days: crate::defaults::WINDOW_DAYS,
        }
    }
}

/// Association-ranking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Prefix selecting probability features
    pub feature_prefix: String,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            feature_prefix: crate::defaults::FEATURE_PREFIX.to_string(),
        }
    }
}

/// Sentiment model training parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Vocabulary cap for the TF-IDF vectorizer
    pub max_features: usize,
    /// Gradient-descent learning rate
    pub learning_rate: f64,
    /// Gradient-descent iterations
    pub max_iter: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_features: crate::defaults::MAX_FEATURES,
            learning_rate: 0.5,
            max_iter: 500,
        }
    }
}
