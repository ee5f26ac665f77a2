//! Deterministic match identifiers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A match identifier derived from the fixture's content hash.
///
/// The same league, season, date and pairing always hash to the same id, so
/// importing a results file twice does not duplicate rows.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    /// Hash the identifying fields of a fixture.
    /// SHA256 over the `|`-joined fields, truncated to 16 hex characters.
    pub fn for_fixture(
        league: &str,
        season: &str,
        match_date: NaiveDate,
        home_team: &str,
        away_team: &str,
    ) -> Self {
        let date = match_date.format("%Y-%m-%d").to_string();
        let fields = [league, season, date.as_str(), home_team, away_team];

        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.trim().as_bytes());
        }
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchId({})", self.0)
    }
}

impl From<String> for MatchId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
