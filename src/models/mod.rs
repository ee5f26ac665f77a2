//! Core data models for match history and derived statistics.

mod ids;
mod match_record;
mod prediction;
mod stats;

pub use ids::*;
pub use match_record::*;
pub use prediction::*;
pub use stats::*;
