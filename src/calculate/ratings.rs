//! Attack/defense strength ratios with shrinkage toward the league average.

use tracing::debug;

use super::CalcError;
use crate::models::{LeagueAverages, MatchRecord, RatingSet, TeamRatings};

/// Pseudo-matches of league-average performance added to every team's
/// record before its rate is taken.
pub const SHRINKAGE_K: f64 = 6.0;

#[derive(Debug, Default)]
struct VenueTotals {
    games: u32,
    scored: u32,
    conceded: u32,
}

/// Home and away goals per game over the history.
pub fn league_averages(history: &[&MatchRecord]) -> Result<LeagueAverages, CalcError> {
    let mut matches = 0u32;
    let mut home_goals = 0u64;
    let mut away_goals = 0u64;

    for m in history {
        let Some(score) = m.final_score()? else {
            continue;
        };
        matches += 1;
        home_goals += score.home as u64;
        away_goals += score.away as u64;
    }

    let (home_avg, away_avg) = if matches == 0 {
        (0.0, 0.0)
    } else {
        (
            home_goals as f64 / matches as f64,
            away_goals as f64 / matches as f64,
        )
    };

    Ok(LeagueAverages {
        matches,
        home_goals_per_game: home_avg,
        away_goals_per_game: away_avg,
    })
}

/// Shrunk rate as a multiple of the league average.
///
/// `rate = (sum + K * avg) / (count + K)`, then divided by `avg`. No
/// observations, or a league average of zero, gives exactly 1.0.
pub fn shrunk_ratio(observed_sum: u32, observed_count: u32, league_avg: f64) -> f64 {
    if observed_count == 0 || league_avg <= 0.0 {
        return 1.0;
    }
    let rate = (observed_sum as f64 + SHRINKAGE_K * league_avg)
        / (observed_count as f64 + SHRINKAGE_K);
    rate / league_avg
}

fn team_ratings(
    history: &[&MatchRecord],
    team: &str,
    averages: &LeagueAverages,
) -> Result<TeamRatings, CalcError> {
    let mut home = VenueTotals::default();
    let mut away = VenueTotals::default();

    for m in history {
        let Some(score) = m.final_score()? else {
            continue;
        };
        if m.home_team == team {
            home.games += 1;
            home.scored += score.home;
            home.conceded += score.away;
        } else if m.away_team == team {
            away.games += 1;
            away.scored += score.away;
            away.conceded += score.home;
        }
    }

    let avg_home = averages.home_goals_per_game;
    let avg_away = averages.away_goals_per_game;

    Ok(TeamRatings {
        team: team.to_string(),
        // At home a team scores against the home baseline and concedes
        // against the away baseline; away it is the other way round.
        home_attack: shrunk_ratio(home.scored, home.games, avg_home),
        home_defense: shrunk_ratio(home.conceded, home.games, avg_away),
        away_attack: shrunk_ratio(away.scored, away.games, avg_away),
        away_defense: shrunk_ratio(away.conceded, away.games, avg_home),
        home_games: home.games,
        away_games: away.games,
    })
}

/// Rate both sides of a fixture from the history window.
///
/// Returns `None` for an empty history; callers fall back to the fixed
/// prior instead of estimating anything.
pub fn estimate_ratings(
    history: &[&MatchRecord],
    home_team: &str,
    away_team: &str,
) -> Result<Option<RatingSet>, CalcError> {
    if history.is_empty() {
        return Ok(None);
    }

    let averages = league_averages(history)?;
    let home = team_ratings(history, home_team, &averages)?;
    let away = team_ratings(history, away_team, &averages)?;

    debug!(
        "League averages over {} matches: home {:.3}, away {:.3}",
        averages.matches, averages.home_goals_per_game, averages.away_goals_per_game
    );
    debug!(
        "{}: home attack {:.3}, home defense {:.3}; {}: away attack {:.3}, away defense {:.3}",
        home.team,
        home.home_attack,
        home.home_defense,
        away.team,
        away.away_attack,
        away.away_defense
    );

    Ok(Some(RatingSet {
        averages,
        home,
        away,
    }))
}
