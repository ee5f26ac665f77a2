//! Match record model: one fixture and its final score, if known.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::MatchId;

/// A single league fixture.
///
/// Goals are either both present (a played match) or both absent (an
/// unplayed or unrecorded one). Anything else is a storage fault and is
/// reported by [`MatchRecord::final_score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub league: String,
    pub season: String,
    pub home_team: String,
    pub away_team: String,
    pub match_date: NaiveDate,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
}

/// A known full-time score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

/// Raised when a stored row carries exactly one goal count.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("match {id} has a one-sided score (home_goals={home:?}, away_goals={away:?})")]
pub struct ScoreIntegrityError {
    pub id: MatchId,
    pub home: Option<u32>,
    pub away: Option<u32>,
}

/// Which side of the fixture a team played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Home,
    Away,
}

/// Result of a match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
    #[serde(rename = "U")]
    Unknown,
}

impl Outcome {
    /// Classify a score line from the scoring side's perspective.
    pub fn from_goals(goals_for: u32, goals_against: u32) -> Self {
        match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }

    /// Single-letter form code.
    pub fn code(&self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Draw => 'D',
            Outcome::Loss => 'L',
            Outcome::Unknown => 'U',
        }
    }

    /// The same result seen from the opponent's side.
    pub fn flipped(&self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            other => *other,
        }
    }

    /// League points awarded for this result.
    pub fn points(&self) -> u32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss | Outcome::Unknown => 0,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A match re-read from one participant's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perspective {
    pub venue: Venue,
    pub outcome: Outcome,
    /// `(goals_for, goals_against)`, absent for unknown results.
    pub goals: Option<(u32, u32)>,
}

impl MatchRecord {
    /// Create an unplayed fixture with a content-derived id.
    pub fn new(
        league: impl Into<String>,
        season: impl Into<String>,
        match_date: NaiveDate,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
    ) -> Self {
        let league = league.into();
        let season = season.into();
        let home_team = home_team.into();
        let away_team = away_team.into();
        let id = MatchId::for_fixture(&league, &season, match_date, &home_team, &away_team);

        Self {
            id,
            league,
            season,
            home_team,
            away_team,
            match_date,
            home_goals: None,
            away_goals: None,
        }
    }

    /// Attach a full-time score.
    pub fn with_score(mut self, home_goals: u32, away_goals: u32) -> Self {
        self.home_goals = Some(home_goals);
        self.away_goals = Some(away_goals);
        self
    }

    /// The final score, `None` when the result is unknown.
    pub fn final_score(&self) -> Result<Option<Score>, ScoreIntegrityError> {
        match (self.home_goals, self.away_goals) {
            (Some(home), Some(away)) => Ok(Some(Score { home, away })),
            (None, None) => Ok(None),
            (home, away) => Err(ScoreIntegrityError {
                id: self.id.clone(),
                home,
                away,
            }),
        }
    }

    /// Whether `team` played in this match on either side.
    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// Whether the two teams met here, in either venue configuration.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.home_team == a && self.away_team == b) || (self.home_team == b && self.away_team == a)
    }

    /// Season filter semantics: an all-digit filter matches a season equal to
    /// it or starting with it (`"2023"` matches `"2023/2024"`); anything else
    /// must equal the trimmed season exactly.
    pub fn in_season(&self, season: &str) -> bool {
        let wanted = season.trim();
        let stored = self.season.trim();
        if !wanted.is_empty() && wanted.chars().all(|c| c.is_ascii_digit()) {
            stored == wanted || stored.starts_with(wanted)
        } else {
            stored == wanted
        }
    }

    /// Re-read the match from `team`'s side. `Ok(None)` if the team did not play.
    pub fn perspective(&self, team: &str) -> Result<Option<Perspective>, ScoreIntegrityError> {
        let venue = if self.home_team == team {
            Venue::Home
        } else if self.away_team == team {
            Venue::Away
        } else {
            return Ok(None);
        };

        let goals = self.final_score()?.map(|s| match venue {
            Venue::Home => (s.home, s.away),
            Venue::Away => (s.away, s.home),
        });
        let outcome = match goals {
            Some((gf, ga)) => Outcome::from_goals(gf, ga),
            None => Outcome::Unknown,
        };

        Ok(Some(Perspective {
            venue,
            outcome,
            goals,
        }))
    }
}
