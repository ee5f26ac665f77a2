//! Statistics and prediction engine.
//!
//! Every function here is a pure transform over a snapshot of match records
//! that the caller has already fetched:
//! - Team season aggregates and recent form
//! - Head-to-head records between two teams
//! - League tables
//! - History windows, shrinkage ratings and Poisson outcome prediction

pub mod head_to_head;
pub mod league_table;
pub mod poisson;
pub mod ratings;
pub mod team_stats;
pub mod window;

pub use head_to_head::compute_head_to_head;
pub use league_table::build_league_table;
pub use poisson::{poisson_pmf, predict, ScoreMatrix};
pub use ratings::estimate_ratings;
pub use team_stats::compute_team_stats;
pub use window::{resolve_window, select_history};

use thiserror::Error;

use crate::models::ScoreIntegrityError;
use crate::storage::StorageError;

/// Errors surfaced by the engine and the service layer around it.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Data integrity fault: {0}")]
    Integrity(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ScoreIntegrityError> for CalcError {
    fn from(err: ScoreIntegrityError) -> Self {
        CalcError::Integrity(err.to_string())
    }
}

/// Round to 3 decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// `numerator / played` rounded to 3 decimals, `None` if nothing was played.
pub fn per_game(numerator: u32, played: u32) -> Option<f64> {
    if played == 0 {
        None
    } else {
        Some(round3(numerator as f64 / played as f64))
    }
}

/// Apply a default and check an integer parameter's bounds.
pub fn bounded(
    name: &str,
    value: Option<u32>,
    default: u32,
    min: u32,
    max: u32,
) -> Result<u32, CalcError> {
    let v = value.unwrap_or(default);
    if v < min {
        return Err(CalcError::InvalidArgument(format!(
            "{} must be >= {}",
            name, min
        )));
    }
    if v > max {
        return Err(CalcError::InvalidArgument(format!(
            "{} must be <= {}",
            name, max
        )));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round3() {
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round3(2.0 / 3.0), 0.667);
        assert_eq!(round3(0.0), 0.0);
    }

    #[test]
    fn test_per_game() {
        assert_eq!(per_game(7, 3), Some(2.333));
        assert_eq!(per_game(0, 4), Some(0.0));
        assert_eq!(per_game(5, 0), None);
    }

    #[test]
    fn test_bounded_default_and_limits() {
        assert_eq!(bounded("last_n", None, 5, 1, 20).unwrap(), 5);
        assert_eq!(bounded("last_n", Some(20), 5, 1, 20).unwrap(), 20);

        let err = bounded("last_n", Some(0), 5, 1, 20).unwrap_err();
        assert_eq!(err.to_string(), "last_n must be >= 1");

        let err = bounded("last_n", Some(21), 5, 1, 20).unwrap_err();
        assert_eq!(err.to_string(), "last_n must be <= 20");
    }

    #[test]
    fn test_integrity_conversion() {
        let err: CalcError = ScoreIntegrityError {
            id: "abc".into(),
            home: Some(1),
            away: None,
        }
        .into();
        assert!(matches!(err, CalcError::Integrity(_)));
    }
}
