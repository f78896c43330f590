//! Text vectorization and sentiment modeling.

pub mod features;
pub mod sentiment;
pub mod vectorizer;

pub use features::attach_probability_features;
pub use sentiment::{class_name, ModelError, SentimentModel, CLASS_LABELS};
pub use vectorizer::TfidfVectorizer;
