//! Request-level operations: fetch a snapshot from the repository, run one
//! engine over it, return the result.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};

use crate::calculate::poisson::Fixture;
use crate::calculate::{
    build_league_table, compute_head_to_head, compute_team_stats, predict, resolve_window,
    select_history, CalcError,
};
use crate::config::PredictionConfig;
use crate::models::{
    HeadToHeadSummary, LeagueTable, MatchId, MatchRecord, PredictionResult, TeamSeasonStats,
};
use crate::storage::{DistinctField, MatchFilter, MatchPage, MatchRepository, SortOrder};

/// Inputs for a prediction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionRequest {
    pub league: String,
    #[serde(default)]
    pub season: Option<String>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub cutoff: Option<NaiveDate>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub last_n: Option<u32>,
    #[serde(default)]
    pub last_days: Option<u32>,
}

/// Stats and prediction over a match repository.
#[derive(Clone)]
pub struct StatsService {
    repo: Arc<dyn MatchRepository>,
    prediction: PredictionConfig,
}

impl StatsService {
    pub fn new(repo: Arc<dyn MatchRepository>, prediction: PredictionConfig) -> Self {
        Self { repo, prediction }
    }

    pub fn count(&self) -> Result<usize, CalcError> {
        logged(self.repo.count().map_err(CalcError::from))
    }

    pub fn leagues(&self) -> Result<Vec<String>, CalcError> {
        logged(
            self.repo
                .distinct(DistinctField::League, &MatchFilter::default())
                .map_err(CalcError::from),
        )
    }

    pub fn seasons(&self, league: &str) -> Result<Vec<String>, CalcError> {
        let league = required("league", league)?;
        logged(
            self.repo
                .distinct(DistinctField::Season, &MatchFilter::for_league(league))
                .map_err(CalcError::from),
        )
    }

    pub fn teams(
        &self,
        league: Option<&str>,
        season: Option<&str>,
    ) -> Result<Vec<String>, CalcError> {
        let filter = MatchFilter {
            league: league.map(str::to_string),
            season: season.map(str::to_string),
            ..Default::default()
        };
        logged(
            self.repo
                .distinct(DistinctField::Team, &filter)
                .map_err(CalcError::from),
        )
    }

    pub fn matches(&self, filter: &MatchFilter) -> Result<MatchPage, CalcError> {
        logged(self.repo.query(filter).map_err(CalcError::from))
    }

    pub fn get_match(&self, id: &MatchId) -> Result<MatchRecord, CalcError> {
        let found = logged(self.repo.get(id).map_err(CalcError::from))?;
        found.ok_or_else(|| CalcError::NotFound("Match not found".to_string()))
    }

    pub fn team_stats(
        &self,
        league: &str,
        season: &str,
        team: &str,
        last_n: Option<u32>,
    ) -> Result<TeamSeasonStats, CalcError> {
        let league = required("league", league)?;
        let season = required("season", season)?;
        let team = required("team", team)?;

        let filter = MatchFilter {
            team: Some(team.to_string()),
            ..MatchFilter::for_league(league).with_season(Some(season))
        };
        let rows = self.fetch(&filter)?;
        let stats = logged(compute_team_stats(league, season, team, &rows, last_n))?;

        info!(
            "Team stats for {} in {} {}: {} played, form {}",
            team, league, season, stats.overall.played, stats.form
        );
        Ok(stats)
    }

    pub fn head_to_head(
        &self,
        league: &str,
        season: Option<&str>,
        team_a: &str,
        team_b: &str,
        last_n: Option<u32>,
    ) -> Result<HeadToHeadSummary, CalcError> {
        let league = required("league", league)?;
        let team_a = required("team_a", team_a)?;
        let team_b = required("team_b", team_b)?;
        let season = season.map(str::trim).filter(|s| !s.is_empty());

        let filter = MatchFilter {
            team: Some(team_a.to_string()),
            opponent: Some(team_b.to_string()),
            ..MatchFilter::for_league(league).with_season(season)
        };
        let rows = self.fetch(&filter)?;
        let summary = logged(compute_head_to_head(
            league, season, team_a, team_b, &rows, last_n,
        ))?;

        info!(
            "Head-to-head {} vs {} in {}: {} meetings",
            team_a, team_b, league, summary.played
        );
        Ok(summary)
    }

    pub fn league_table(&self, league: &str, season: &str) -> Result<LeagueTable, CalcError> {
        let league = required("league", league)?;
        let season = required("season", season)?;

        let rows = self.fetch(&MatchFilter::for_league(league).with_season(Some(season)))?;
        if rows.is_empty() {
            return Err(CalcError::NotFound(format!(
                "No matches for {} {}",
                league, season
            )));
        }
        let table = logged(build_league_table(league, season, &rows))?;

        info!(
            "Built league table for {} {}: {} teams",
            league,
            season,
            table.rows.len()
        );
        Ok(table)
    }

    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, CalcError> {
        let league = required("league", &request.league)?;
        let home_team = required("home_team", &request.home_team)?;
        let away_team = required("away_team", &request.away_team)?;
        if home_team == away_team {
            return Err(CalcError::InvalidArgument(
                "home_team and away_team must be different teams".to_string(),
            ));
        }
        let season = request
            .season
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mode = request
            .mode
            .as_deref()
            .unwrap_or(&self.prediction.default_mode);
        let window = resolve_window(
            mode,
            request.last_n,
            request.last_days,
            request.cutoff,
            self.prediction.default_last_n,
        )?;

        let rows = self.fetch(&MatchFilter::for_league(league))?;
        let history = logged(select_history(&rows, window, request.cutoff, season))?;

        let fixture = Fixture {
            league,
            season,
            home_team,
            away_team,
        };
        let result = logged(predict(fixture, request.cutoff, window, &history))?;

        info!(
            "Predicted {} vs {} from {} matches: {:.3}/{:.3}/{:.3}",
            home_team,
            away_team,
            result.history_matches,
            result.p_home,
            result.p_draw,
            result.p_away
        );
        Ok(result)
    }

    /// Every row matching `filter`, oldest first, without paging.
    fn fetch(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>, CalcError> {
        let filter = MatchFilter {
            sort: SortOrder::MatchDateAsc,
            limit: None,
            offset: 0,
            ..filter.clone()
        };
        let page = logged(self.repo.query(&filter).map_err(CalcError::from))?;
        Ok(page.items)
    }
}

fn required<'a>(name: &str, value: &'a str) -> Result<&'a str, CalcError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CalcError::InvalidArgument(format!("{} is required", name)));
    }
    Ok(trimmed)
}

/// Record faults that callers will only see as a generic error.
fn logged<T>(result: Result<T, CalcError>) -> Result<T, CalcError> {
    if let Err(e @ (CalcError::Integrity(_) | CalcError::Storage(_))) = &result {
        error!("{}", e);
    }
    result
}
