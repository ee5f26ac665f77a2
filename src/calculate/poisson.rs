//! Independent-Poisson goal model.
//!
//! Each side's goals are Poisson with rate `lambda`; the two sides are
//! treated as independent. Probabilities are read off a truncated score grid.

use chrono::NaiveDate;
use tracing::debug;

use super::ratings::estimate_ratings;
use super::CalcError;
use crate::models::{HistoryWindow, MatchRecord, PredictionResult, RatingSet, Scoreline};

/// Highest goal count per side on the score grid.
pub const MAX_GOALS: u32 = 10;

pub const LAMBDA_MIN: f64 = 0.2;
pub const LAMBDA_MAX: f64 = 4.5;

/// Rates used when there is no history at all.
pub const PRIOR_LAMBDA_HOME: f64 = 1.2;
pub const PRIOR_LAMBDA_AWAY: f64 = 1.0;

/// `P(k; lambda) = e^-lambda * lambda^k / k!`. A non-positive rate puts all
/// mass on zero.
pub fn poisson_pmf(k: u32, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    let factorial: f64 = (1..=k).map(|i| i as f64).product();
    (-lambda).exp() * lambda.powi(k as i32) / factorial
}

/// Expected goals for home and away, clamped to `[LAMBDA_MIN, LAMBDA_MAX]`.
pub fn expected_goals(ratings: &RatingSet) -> (f64, f64) {
    let avg = &ratings.averages;
    let lambda_home =
        avg.home_goals_per_game * ratings.home.home_attack * ratings.away.away_defense;
    let lambda_away =
        avg.away_goals_per_game * ratings.away.away_attack * ratings.home.home_defense;
    (
        lambda_home.clamp(LAMBDA_MIN, LAMBDA_MAX),
        lambda_away.clamp(LAMBDA_MIN, LAMBDA_MAX),
    )
}

/// Joint score probabilities on `[0, MAX_GOALS]` for both sides.
///
/// Mass beyond the grid is dropped, so the cells sum to slightly under 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    cells: Vec<Vec<f64>>,
}

impl ScoreMatrix {
    pub fn new(lambda_home: f64, lambda_away: f64) -> Self {
        let home: Vec<f64> = (0..=MAX_GOALS).map(|k| poisson_pmf(k, lambda_home)).collect();
        let away: Vec<f64> = (0..=MAX_GOALS).map(|k| poisson_pmf(k, lambda_away)).collect();

        let cells = home
            .iter()
            .map(|ph| away.iter().map(|pa| ph * pa).collect())
            .collect();
        Self { cells }
    }

    /// `P(home = i, away = j)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i][j]
    }

    /// `(p_home, p_draw, p_away)`.
    pub fn outcome_probabilities(&self) -> (f64, f64, f64) {
        let mut p_home = 0.0;
        let mut p_draw = 0.0;
        let mut p_away = 0.0;

        for (i, row) in self.cells.iter().enumerate() {
            for (j, p) in row.iter().enumerate() {
                match i.cmp(&j) {
                    std::cmp::Ordering::Greater => p_home += p,
                    std::cmp::Ordering::Equal => p_draw += p,
                    std::cmp::Ordering::Less => p_away += p,
                }
            }
        }
        (p_home, p_draw, p_away)
    }

    /// The most probable cell. Ties keep the first cell met scanning home
    /// goals ascending, then away goals ascending.
    pub fn most_likely(&self) -> Scoreline {
        let mut best = Scoreline {
            home_goals: 0,
            away_goals: 0,
            p: self.cells[0][0],
        };
        for (i, row) in self.cells.iter().enumerate() {
            for (j, &p) in row.iter().enumerate() {
                if p > best.p {
                    best = Scoreline {
                        home_goals: i as u32,
                        away_goals: j as u32,
                        p,
                    };
                }
            }
        }
        best
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.cells
    }
}

/// The fixture being predicted.
#[derive(Debug, Clone, Copy)]
pub struct Fixture<'a> {
    pub league: &'a str,
    pub season: Option<&'a str>,
    pub home_team: &'a str,
    pub away_team: &'a str,
}

/// Predict a fixture from an already selected history window.
pub fn predict(
    fixture: Fixture<'_>,
    cutoff: Option<NaiveDate>,
    window: HistoryWindow,
    history: &[&MatchRecord],
) -> Result<PredictionResult, CalcError> {
    let ratings = estimate_ratings(history, fixture.home_team, fixture.away_team)?;
    let (lambda_home, lambda_away) = match &ratings {
        Some(r) => expected_goals(r),
        None => (PRIOR_LAMBDA_HOME, PRIOR_LAMBDA_AWAY),
    };

    let matrix = ScoreMatrix::new(lambda_home, lambda_away);
    let (p_home, p_draw, p_away) = matrix.outcome_probabilities();
    let most_likely_score = matrix.most_likely();

    debug!(
        "{} vs {}: lambda {:.3}/{:.3}, p {:.3}/{:.3}/{:.3}",
        fixture.home_team, fixture.away_team, lambda_home, lambda_away, p_home, p_draw, p_away
    );

    Ok(PredictionResult {
        league: fixture.league.to_string(),
        season: fixture.season.map(str::to_string),
        home_team: fixture.home_team.to_string(),
        away_team: fixture.away_team.to_string(),
        cutoff,
        window,
        history_matches: history.len() as u32,
        lambda_home,
        lambda_away,
        p_home,
        p_draw,
        p_away,
        most_likely_score,
        ratings,
        score_matrix: matrix.into_rows(),
    })
}
