//! Team season aggregates and recent form.

use tracing::debug;

use super::{bounded, per_game, CalcError};
use crate::models::{MatchRecord, Outcome, PerGameRates, RecordLine, TeamSeasonStats, Venue};
use crate::names::display_name;

/// Form window used when the caller does not ask for one.
pub const DEFAULT_FORM_LENGTH: u32 = 5;

/// Largest accepted form window.
pub const MAX_FORM_LENGTH: u32 = 20;

fn rates(line: &RecordLine) -> PerGameRates {
    PerGameRates {
        goals_for: per_game(line.goals_for, line.played),
        goals_against: per_game(line.goals_against, line.played),
        points: per_game(line.points(), line.played),
    }
}

/// Aggregate a team's matches in one league season.
///
/// `matches` should be the team's fixtures for the season; rows the team did
/// not play in are ignored. Results without a score count towards
/// `total_matches` and `unknown` but not towards any aggregate or the form.
pub fn compute_team_stats(
    league: &str,
    season: &str,
    team: &str,
    matches: &[MatchRecord],
    last_n: Option<u32>,
) -> Result<TeamSeasonStats, CalcError> {
    let last_n = bounded("last_n", last_n, DEFAULT_FORM_LENGTH, 1, MAX_FORM_LENGTH)?;

    let mut ordered: Vec<&MatchRecord> = matches.iter().filter(|m| m.involves(team)).collect();
    if ordered.is_empty() {
        return Err(CalcError::NotFound(format!(
            "No matches for {} in {} {}",
            team, league, season
        )));
    }
    ordered.sort_by_key(|m| m.match_date);

    let mut overall = RecordLine::default();
    let mut home = RecordLine::default();
    let mut away = RecordLine::default();
    let mut unknown = 0u32;
    let mut known_outcomes: Vec<Outcome> = Vec::with_capacity(ordered.len());

    for m in &ordered {
        let Some(p) = m.perspective(team)? else {
            continue;
        };
        let Some((gf, ga)) = p.goals else {
            unknown += 1;
            continue;
        };

        overall.add(p.outcome, gf, ga);
        match p.venue {
            Venue::Home => home.add(p.outcome, gf, ga),
            Venue::Away => away.add(p.outcome, gf, ga),
        }
        known_outcomes.push(p.outcome);
    }

    let skip = known_outcomes.len().saturating_sub(last_n as usize);
    let form: String = known_outcomes[skip..].iter().map(|o| o.code()).collect();

    debug!(
        "Team stats for {} ({} {}): {} played, {} unknown, form {}",
        team, league, season, overall.played, unknown, form
    );

    Ok(TeamSeasonStats {
        team: team.to_string(),
        display_name: display_name(team),
        league: league.to_string(),
        season: season.to_string(),
        overall,
        home,
        away,
        per_game: rates(&overall),
        home_per_game: rates(&home),
        away_per_game: rates(&away),
        total_matches: ordered.len() as u32,
        unknown,
        last_n,
        form,
    })
}
