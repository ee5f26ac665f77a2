//! Head-to-head record between two teams.

use tracing::debug;

use super::{bounded, CalcError};
use crate::models::{HeadToHeadMatch, HeadToHeadSummary, MatchRecord};

pub const DEFAULT_H2H_LENGTH: u32 = 10;
pub const MAX_H2H_LENGTH: u32 = 50;

/// Build the record between `team_a` and `team_b`, seen from `team_a`.
///
/// Meetings at either venue count. The most recent `last_n` are kept, newest
/// first; unknown results are listed but do not enter the totals.
pub fn compute_head_to_head(
    league: &str,
    season: Option<&str>,
    team_a: &str,
    team_b: &str,
    matches: &[MatchRecord],
    last_n: Option<u32>,
) -> Result<HeadToHeadSummary, CalcError> {
    let last_n = bounded("last_n", last_n, DEFAULT_H2H_LENGTH, 1, MAX_H2H_LENGTH)?;
    if team_a == team_b {
        return Err(CalcError::InvalidArgument(
            "team_a and team_b must be different teams".to_string(),
        ));
    }

    let mut meetings: Vec<&MatchRecord> = matches
        .iter()
        .filter(|m| m.is_between(team_a, team_b))
        .collect();
    if meetings.is_empty() {
        return Err(CalcError::NotFound(format!(
            "No matches between {} and {} in {}",
            team_a, team_b, league
        )));
    }
    meetings.sort_by(|x, y| y.match_date.cmp(&x.match_date));
    meetings.truncate(last_n as usize);

    let mut summary = HeadToHeadSummary {
        league: league.to_string(),
        season: season.map(str::to_string),
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        played: 0,
        team_a_wins: 0,
        draws: 0,
        team_b_wins: 0,
        team_a_goals: 0,
        team_b_goals: 0,
        unknown: 0,
        matches: Vec::with_capacity(meetings.len()),
    };

    for m in meetings {
        // is_between guarantees team_a is on one side
        let Some(p) = m.perspective(team_a)? else {
            continue;
        };
        summary.matches.push(HeadToHeadMatch::from_record(m, p.outcome));

        let Some((a_goals, b_goals)) = p.goals else {
            summary.unknown += 1;
            continue;
        };
        summary.played += 1;
        summary.team_a_goals += a_goals;
        summary.team_b_goals += b_goals;
        match a_goals.cmp(&b_goals) {
            std::cmp::Ordering::Greater => summary.team_a_wins += 1,
            std::cmp::Ordering::Equal => summary.draws += 1,
            std::cmp::Ordering::Less => summary.team_b_wins += 1,
        }
    }

    debug!(
        "Head-to-head {} vs {}: {}W {}D {}L over {} meetings",
        team_a,
        team_b,
        summary.team_a_wins,
        summary.draws,
        summary.team_b_wins,
        summary.matches.len()
    );

    Ok(summary)
}
