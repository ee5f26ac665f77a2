//! Derived statistics models.
//!
//! Everything here is recomputed per request from a snapshot of match
//! records and never written back to storage.

use chrono::NaiveDate;
use serde::Serialize;

use super::{MatchId, MatchRecord, Outcome};

/// Win/draw/loss and goal totals over a set of known-score matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordLine {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl RecordLine {
    /// Add one known-score match. Unknown outcomes are ignored.
    pub fn add(&mut self, outcome: Outcome, goals_for: u32, goals_against: u32) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Unknown => return,
        }
        self.played += 1;
        self.goals_for += goals_for;
        self.goals_against += goals_against;
    }

    pub fn points(&self) -> u32 {
        self.wins * 3 + self.draws
    }

    pub fn goal_diff(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }
}

/// Per-game averages, rounded to 3 decimals. `None` when nothing was played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerGameRates {
    pub goals_for: Option<f64>,
    pub goals_against: Option<f64>,
    pub points: Option<f64>,
}

/// Season aggregates and recent form for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSeasonStats {
    /// Team name as stored
    pub team: String,

    /// Canonical label for display
    pub display_name: String,

    pub league: String,
    pub season: String,

    /// Known-score matches at either venue
    pub overall: RecordLine,
    pub home: RecordLine,
    pub away: RecordLine,

    pub per_game: PerGameRates,
    pub home_per_game: PerGameRates,
    pub away_per_game: PerGameRates,

    /// Matches retrieved, including those without a result
    pub total_matches: u32,

    /// Matches without a recorded result
    pub unknown: u32,

    /// Requested form window
    pub last_n: u32,

    /// Outcome codes of the most recent known results, oldest first
    pub form: String,
}

/// One meeting in a head-to-head listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHeadMatch {
    pub id: MatchId,
    pub season: String,
    pub match_date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    /// Result from the first team's perspective
    pub outcome: Outcome,
}

impl HeadToHeadMatch {
    pub fn from_record(record: &MatchRecord, outcome: Outcome) -> Self {
        Self {
            id: record.id.clone(),
            season: record.season.clone(),
            match_date: record.match_date,
            home_team: record.home_team.clone(),
            away_team: record.away_team.clone(),
            home_goals: record.home_goals,
            away_goals: record.away_goals,
            outcome,
        }
    }
}

/// Record between two teams, from `team_a`'s perspective.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHeadSummary {
    pub league: String,
    pub season: Option<String>,
    pub team_a: String,
    pub team_b: String,
    /// Known-score meetings
    pub played: u32,
    pub team_a_wins: u32,
    pub draws: u32,
    pub team_b_wins: u32,
    pub team_a_goals: u32,
    pub team_b_goals: u32,
    /// Meetings without a recorded result
    pub unknown: u32,
    /// Most recent first
    pub matches: Vec<HeadToHeadMatch>,
}

/// One row of a league table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueTableRow {
    pub rank: u32,
    pub team: String,
    pub display_name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_diff: i64,
    pub points: u32,
}

/// Standings for a league season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueTable {
    pub league: String,
    pub season: String,
    pub rows: Vec<LeagueTableRow>,
}

impl LeagueTable {
    /// Find a team's row by stored name.
    pub fn row(&self, team: &str) -> Option<&LeagueTableRow> {
        self.rows.iter().find(|r| r.team == team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_line_accumulates() {
        let mut line = RecordLine::default();
        line.add(Outcome::Win, 2, 1);
        line.add(Outcome::Draw, 0, 0);
        line.add(Outcome::Loss, 1, 4);

        assert_eq!(line.played, 3);
        assert_eq!(line.points(), 4);
        assert_eq!(line.goals_for, 3);
        assert_eq!(line.goals_against, 5);
        assert_eq!(line.goal_diff(), -2);
    }

    #[test]
    fn test_record_line_ignores_unknown() {
        let mut line = RecordLine::default();
        line.add(Outcome::Unknown, 9, 9);
        assert_eq!(line, RecordLine::default());
    }

    #[test]
    fn test_table_row_lookup() {
        let table = LeagueTable {
            league: "Serie A".to_string(),
            season: "2022/2023".to_string(),
            rows: vec![LeagueTableRow {
                rank: 1,
                team: "Napoli".to_string(),
                display_name: "Napoli".to_string(),
                played: 1,
                wins: 1,
                draws: 0,
                losses: 0,
                goals_for: 2,
                goals_against: 0,
                goal_diff: 2,
                points: 3,
            }],
        };

        assert_eq!(table.row("Napoli").map(|r| r.rank), Some(1));
        assert!(table.row("Lazio").is_none());
    }
}
