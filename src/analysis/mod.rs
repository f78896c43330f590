//! Temporal alignment and event-study aggregation.

pub mod align;
pub mod correlation;
pub mod event_study;

pub use align::{align, AlignConfig, AlignedEvent, ReactionMode};
pub use correlation::{pearson, rank};
pub use event_study::{aggregate, EventStudyResult};
