//! Models relating sentiment features to market reactions.

pub mod reaction;

pub use reaction::{feature_matrix, ReactionModel, RegressionError};
