//! Error types for the alignment and aggregation core.

use thiserror::Error;

/// Errors surfaced by the analysis core.
///
/// Soft-drop conditions (unparsable timestamps, events outside tolerance,
/// events missing optional attributes) are not errors; they reduce output
/// cardinality deterministically instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A required field or column is missing from the input.
    #[error("missing required field: {0}")]
    Schema(String),

    /// The caller passed an argument outside the accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
