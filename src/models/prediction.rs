//! Rating and prediction models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How much history feeds a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HistoryWindow {
    /// The most recent `n` qualifying matches
    LastN { n: u32 },
    /// Every qualifying match in the trailing `days`
    LastDays { days: u32 },
}

/// League-wide scoring baselines over the history window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeagueAverages {
    pub matches: u32,
    pub home_goals_per_game: f64,
    pub away_goals_per_game: f64,
}

/// Strength ratios for one team; 1.0 is league average.
///
/// Attack ratios above 1.0 mean the team scores more than average at that
/// venue; defense ratios above 1.0 mean it concedes more.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRatings {
    pub team: String,
    pub home_attack: f64,
    pub home_defense: f64,
    pub away_attack: f64,
    pub away_defense: f64,
    pub home_games: u32,
    pub away_games: u32,
}

impl TeamRatings {
    /// A team with no observations rates as exactly average.
    pub fn neutral(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            home_attack: 1.0,
            home_defense: 1.0,
            away_attack: 1.0,
            away_defense: 1.0,
            home_games: 0,
            away_games: 0,
        }
    }
}

/// Ratings for both sides of a fixture plus the baselines they scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSet {
    pub averages: LeagueAverages,
    pub home: TeamRatings,
    pub away: TeamRatings,
}

/// A single cell of the score matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scoreline {
    pub home_goals: u32,
    pub away_goals: u32,
    pub p: f64,
}

/// Outcome probabilities for a fixture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub league: String,
    pub season: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub cutoff: Option<NaiveDate>,
    pub window: HistoryWindow,

    /// Matches that fed the ratings
    pub history_matches: u32,

    pub lambda_home: f64,
    pub lambda_away: f64,

    pub p_home: f64,
    pub p_draw: f64,
    pub p_away: f64,

    pub most_likely_score: Scoreline,

    /// Absent when the history window was empty and the prior was used
    pub ratings: Option<RatingSet>,

    /// `score_matrix[i][j]` = P(home scores i, away scores j)
    pub score_matrix: Vec<Vec<f64>>,
}
