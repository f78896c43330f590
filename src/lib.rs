//! # News Market Reaction
//!
//! Links discrete, irregularly-timed news events to a continuous market
//! price series and measures how event characteristics relate to subsequent
//! price moves.
//!
//! ## Modules
//!
//! - `data` - CSV/simulated loading, news cleaning, seed labeling
//! - `market` - price series preparation (returns, future returns)
//! - `analysis` - event alignment, event-study aggregation, correlation ranking
//! - `nlp` - TF-IDF vectorization and the sentiment model
//! - `models` - regression of reactions on sentiment features
//!
//! ## Example Usage
//!
//! ```no_run
//! use news_reaction::{align, clean_news, prepare_market, rank, AlignConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let news = news_reaction::load_news("data/news.csv")?;
//!     let market = news_reaction::load_market("data/market.csv")?;
//!
//!     let events = clean_news(&news);
//!     let series = prepare_market(&market)?;
//!     let aligned = align(&events, &series, &AlignConfig::default())?;
//!
//!     let table = rank(&aligned, "sentiment_prob_")?;
//!     for (feature, correlation) in table {
//!         println!("{feature}: {correlation:.4}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod market;
pub mod models;
pub mod nlp;

// Re-exports for convenience
pub use analysis::{
    aggregate, align, pearson, rank, AlignConfig, AlignedEvent, EventStudyResult, ReactionMode,
};
pub use config::Config;
pub use data::{
    clean_news, load_market, load_news, seed_sentiment, AttrValue, NewsEvent, NewsPreprocessor,
    RawNewsItem,
};
pub use error::AnalysisError;
pub use market::{prepare_market, PricePoint, PriceSeries, RawPricePoint};
pub use models::{feature_matrix, ReactionModel};
pub use nlp::{attach_probability_features, SentimentModel, TfidfVectorizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Maximum event-to-market gap in days
    pub const TOLERANCE_DAYS: i64 = 2;

    /// Event-study window in calendar days on each side
    pub const WINDOW_DAYS: i64 = 3;

    /// Prefix of probability feature attributes
    pub const FEATURE_PREFIX: &str = "sentiment_prob_";

    /// Attribute holding the cleaned event text
    pub const TEXT_ATTRIBUTE: &str = "clean_text";

    /// Attribute holding the keyword seed label
    pub const SEED_ATTRIBUTE: &str = "sentiment_seed";

    /// Attribute holding the model's predicted label
    pub const PREDICTION_ATTRIBUTE: &str = "sentiment_pred";

    /// Vocabulary cap for the TF-IDF vectorizer
    pub const MAX_FEATURES: usize = 1000;
}
