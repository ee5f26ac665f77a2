//! League standings.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use super::CalcError;
use crate::models::{LeagueTable, LeagueTableRow, MatchRecord, Outcome, RecordLine};
use crate::names::display_name;

/// Standings order: points, goal difference, goals scored (all descending),
/// then team name ascending. Distinct names never compare equal.
pub fn standings_order(a: &LeagueTableRow, b: &LeagueTableRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_diff.cmp(&a.goal_diff))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.team.cmp(&b.team))
}

/// Build the table for one league season from its fixtures.
///
/// Only known results count. A team appears once it has at least one
/// completed match.
pub fn build_league_table(
    league: &str,
    season: &str,
    matches: &[MatchRecord],
) -> Result<LeagueTable, CalcError> {
    let mut lines: HashMap<&str, RecordLine> = HashMap::new();

    for m in matches {
        let Some(score) = m.final_score()? else {
            continue;
        };
        let home_outcome = Outcome::from_goals(score.home, score.away);

        lines
            .entry(m.home_team.as_str())
            .or_default()
            .add(home_outcome, score.home, score.away);
        lines
            .entry(m.away_team.as_str())
            .or_default()
            .add(home_outcome.flipped(), score.away, score.home);
    }

    let mut rows: Vec<LeagueTableRow> = lines
        .into_iter()
        .map(|(team, line)| LeagueTableRow {
            rank: 0,
            team: team.to_string(),
            display_name: display_name(team),
            played: line.played,
            wins: line.wins,
            draws: line.draws,
            losses: line.losses,
            goals_for: line.goals_for,
            goals_against: line.goals_against,
            goal_diff: line.goal_diff(),
            points: line.points(),
        })
        .collect();

    rows.sort_by(standings_order);
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }

    debug!("League table for {} {}: {} teams", league, season, rows.len());

    Ok(LeagueTable {
        league: league.to_string(),
        season: season.to_string(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn result(day: u32, home: &str, away: &str, hg: u32, ag: u32) -> MatchRecord {
        fixture(day, home, away).with_score(hg, ag)
    }

    fn fixture(day: u32, home: &str, away: &str) -> MatchRecord {
        MatchRecord::new(
            "Ligue 1",
            "2023/2024",
            NaiveDate::from_ymd_opt(2023, 10, day).unwrap(),
            home,
            away,
        )
    }

    #[test]
    fn test_three_match_example() {
        let matches = vec![
            result(1, "A", "B", 2, 1),
            result(8, "B", "A", 0, 0),
            result(15, "A", "B", 1, 1),
        ];
        let table = build_league_table("Ligue 1", "2023/2024", &matches).unwrap();
        let a = table.row("A").unwrap();

        assert_eq!(a.rank, 1);
        assert_eq!(a.played, 3);
        assert_eq!(a.wins, 1);
        assert_eq!(a.draws, 2);
        assert_eq!(a.losses, 0);
        assert_eq!(a.points, 5);
        assert_eq!(a.goals_for, 3);
        assert_eq!(a.goals_against, 2);

        let b = table.row("B").unwrap();
        assert_eq!((b.rank, b.points, b.losses), (2, 2, 1));
    }

    #[test]
    fn test_points_and_goals_conserved() {
        let matches = vec![
            result(1, "Lens", "Lille", 2, 1),
            result(1, "Nice", "Rennes", 0, 0),
            result(8, "Lille", "Nice", 3, 3),
            result(8, "Rennes", "Lens", 1, 4),
            result(15, "Lens", "Nice", 0, 1),
            fixture(22, "Lille", "Rennes"),
        ];
        let table = build_league_table("Ligue 1", "2023/2024", &matches).unwrap();

        let decisive = 3;
        let drawn = 2;
        let points: u32 = table.rows.iter().map(|r| r.points).sum();
        assert_eq!(points, 3 * decisive + 2 * drawn);

        let gf: u32 = table.rows.iter().map(|r| r.goals_for).sum();
        let ga: u32 = table.rows.iter().map(|r| r.goals_against).sum();
        assert_eq!(gf, ga);
    }

    #[test]
    fn test_tie_breaks() {
        let matches = vec![
            // Equal points; goal difference separates
            result(1, "Brest", "Metz", 3, 0),
            result(1, "Lorient", "Nantes", 1, 0),
            // Equal points and difference; goals scored separates
            result(8, "Reims", "Toulouse", 4, 3),
            result(8, "Monaco", "Lyon", 2, 1),
            // Full tie; name decides
            result(15, "Angers", "Auxerre", 1, 0),
            result(15, "Ajaccio", "Troyes", 1, 0),
        ];
        let table = build_league_table("Ligue 1", "2023/2024", &matches).unwrap();
        let order: Vec<&str> = table.rows.iter().map(|r| r.team.as_str()).collect();

        assert_eq!(
            order[..6],
            ["Brest", "Reims", "Monaco", "Ajaccio", "Angers", "Lorient"]
        );
    }

    #[test]
    fn test_total_order_never_equal() {
        let matches = vec![
            result(1, "Nice", "Rennes", 1, 1),
            result(1, "Lens", "Lille", 1, 1),
        ];
        let table = build_league_table("Ligue 1", "2023/2024", &matches).unwrap();
        for (i, a) in table.rows.iter().enumerate() {
            for b in table.rows.iter().skip(i + 1) {
                assert_eq!(standings_order(a, b), Ordering::Less);
            }
        }
    }

    #[test]
    fn test_teams_without_results_are_absent() {
        let matches = vec![fixture(1, "Lens", "Lille"), result(8, "Nice", "Lens", 2, 0)];
        let table = build_league_table("Ligue 1", "2023/2024", &matches).unwrap();
        assert!(table.row("Lille").is_none());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].team, "Nice");
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let table = build_league_table("Ligue 1", "2023/2024", &[]).unwrap();
        assert!(table.rows.is_empty());
    }
}
