//! Filtered access to the match history.
//!
//! Engines never read the store directly; they go through `MatchRepository`
//! so the HTTP layer, the CLI and tests can share one query surface.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::{MatchStore, StorageError};
use crate::models::{MatchId, MatchRecord};

/// Unknown literal in a filter parameter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("sort must be one of [match_date_asc, match_date_desc], got '{0}'")]
    Sort(String),

    #[error("result must be one of [away_win, draw, home_win], got '{0}'")]
    Result(String),
}

/// Final result class, from the home side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultClass {
    HomeWin,
    AwayWin,
    Draw,
}

impl ResultClass {
    /// Only rows with a known score can match.
    pub fn matches(&self, record: &MatchRecord) -> bool {
        let (Some(h), Some(a)) = (record.home_goals, record.away_goals) else {
            return false;
        };
        match self {
            ResultClass::HomeWin => h > a,
            ResultClass::AwayWin => h < a,
            ResultClass::Draw => h == a,
        }
    }
}

impl FromStr for ResultClass {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "home_win" => Ok(ResultClass::HomeWin),
            "away_win" => Ok(ResultClass::AwayWin),
            "draw" => Ok(ResultClass::Draw),
            other => Err(FilterError::Result(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    MatchDateAsc,
    MatchDateDesc,
}

impl FromStr for SortOrder {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "match_date_asc" => Ok(SortOrder::MatchDateAsc),
            "match_date_desc" => Ok(SortOrder::MatchDateDesc),
            other => Err(FilterError::Sort(other.to_string())),
        }
    }
}

/// Query over the match history. Every field is optional; an empty filter
/// returns everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchFilter {
    pub league: Option<String>,
    pub season: Option<String>,
    pub team: Option<String>,
    pub opponent: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub result: Option<ResultClass>,
    pub sort: SortOrder,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl MatchFilter {
    pub fn for_league(league: &str) -> Self {
        Self {
            league: Some(league.to_string()),
            ..Default::default()
        }
    }

    pub fn with_season(mut self, season: Option<&str>) -> Self {
        self.season = season.map(str::to_string);
        self
    }

    /// Whether a row passes every predicate. Paging is not applied here.
    pub fn accepts(&self, record: &MatchRecord) -> bool {
        if let Some(league) = &self.league {
            if record.league != league.trim() {
                return false;
            }
        }
        if let Some(season) = &self.season {
            if !record.in_season(season) {
                return false;
            }
        }
        match (&self.team, &self.opponent) {
            (Some(team), Some(opponent)) => {
                if !record.is_between(team.trim(), opponent.trim()) {
                    return false;
                }
            }
            (Some(team), None) | (None, Some(team)) => {
                if !record.involves(team.trim()) {
                    return false;
                }
            }
            (None, None) => {}
        }
        if self.date_from.is_some_and(|from| record.match_date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| record.match_date > to) {
            return false;
        }
        if let Some(result) = &self.result {
            if !result.matches(record) {
                return false;
            }
        }
        true
    }
}

/// One page of results plus the unpaged total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPage {
    pub items: Vec<MatchRecord>,
    pub total: usize,
}

/// Column to enumerate with `distinct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctField {
    League,
    Season,
    Team,
}

/// Read access to the match history.
pub trait MatchRepository: Send + Sync {
    fn query(&self, filter: &MatchFilter) -> Result<MatchPage, StorageError>;

    /// Sorted distinct values of `field` among rows accepted by `filter`.
    fn distinct(
        &self,
        field: DistinctField,
        filter: &MatchFilter,
    ) -> Result<Vec<String>, StorageError>;

    fn get(&self, id: &MatchId) -> Result<Option<MatchRecord>, StorageError>;

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.query(&MatchFilter::default())?.total)
    }
}

/// Filter, sort and page a snapshot. The sort is stable, so rows on the
/// same date keep storage order.
pub fn apply_filter(records: Vec<MatchRecord>, filter: &MatchFilter) -> MatchPage {
    let mut items: Vec<MatchRecord> = records.into_iter().filter(|r| filter.accepts(r)).collect();
    match filter.sort {
        SortOrder::MatchDateAsc => items.sort_by(|a, b| a.match_date.cmp(&b.match_date)),
        SortOrder::MatchDateDesc => items.sort_by(|a, b| b.match_date.cmp(&a.match_date)),
    }

    let total = items.len();
    let items = items
        .into_iter()
        .skip(filter.offset)
        .take(filter.limit.unwrap_or(usize::MAX))
        .collect();

    MatchPage { items, total }
}

pub fn distinct_values<'a>(
    records: impl IntoIterator<Item = &'a MatchRecord>,
    field: DistinctField,
    filter: &MatchFilter,
) -> Vec<String> {
    let mut values = BTreeSet::new();
    for record in records.into_iter().filter(|r| filter.accepts(r)) {
        match field {
            DistinctField::League => {
                values.insert(record.league.clone());
            }
            DistinctField::Season => {
                values.insert(record.season.clone());
            }
            DistinctField::Team => {
                values.insert(record.home_team.clone());
                values.insert(record.away_team.clone());
            }
        }
    }
    values.into_iter().filter(|v| !v.trim().is_empty()).collect()
}

/// In-memory repository over a fixed set of rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryMatchRepository {
    records: Vec<MatchRecord>,
}

impl MemoryMatchRepository {
    pub fn new(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }
}

impl MatchRepository for MemoryMatchRepository {
    fn query(&self, filter: &MatchFilter) -> Result<MatchPage, StorageError> {
        Ok(apply_filter(self.records.clone(), filter))
    }

    fn distinct(
        &self,
        field: DistinctField,
        filter: &MatchFilter,
    ) -> Result<Vec<String>, StorageError> {
        Ok(distinct_values(&self.records, field, filter))
    }

    fn get(&self, id: &MatchId) -> Result<Option<MatchRecord>, StorageError> {
        Ok(self.records.iter().find(|r| &r.id == id).cloned())
    }
}

/// Repository backed by the JSONL store. Each call reads the file once.
#[derive(Debug, Clone)]
pub struct JsonlMatchRepository {
    store: MatchStore,
}

impl JsonlMatchRepository {
    pub fn new(store: MatchStore) -> Self {
        Self { store }
    }
}

impl MatchRepository for JsonlMatchRepository {
    fn query(&self, filter: &MatchFilter) -> Result<MatchPage, StorageError> {
        Ok(apply_filter(self.store.read_all()?, filter))
    }

    fn distinct(
        &self,
        field: DistinctField,
        filter: &MatchFilter,
    ) -> Result<Vec<String>, StorageError> {
        let records = self.store.read_all()?;
        Ok(distinct_values(&records, field, filter))
    }

    fn get(&self, id: &MatchId) -> Result<Option<MatchRecord>, StorageError> {
        Ok(self.store.read_all()?.into_iter().find(|r| &r.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn game(
        league: &str,
        season: &str,
        (y, m, d): (i32, u32, u32),
        home: &str,
        away: &str,
    ) -> MatchRecord {
        MatchRecord::new(league, season, NaiveDate::from_ymd_opt(y, m, d).unwrap(), home, away)
    }

    fn sample() -> Vec<MatchRecord> {
        vec![
            game("Premier League", "2023/2024", (2023, 8, 12), "Arsenal", "Nott'm Forest")
                .with_score(2, 1),
            game("Premier League", "2023/2024", (2023, 8, 12), "Burnley", "Man City")
                .with_score(0, 3),
            game("Premier League", "2023/2024", (2023, 8, 21), "Crystal Palace", "Arsenal")
                .with_score(0, 1),
            game("Premier League", "2023/2024", (2023, 9, 3), "Arsenal", "Man United")
                .with_score(3, 1),
            game("Premier League", "2023/2024", (2023, 10, 8), "Arsenal", "Man City")
                .with_score(1, 0),
            game("Premier League", "2023/2024", (2024, 3, 31), "Man City", "Arsenal")
                .with_score(0, 0),
            game("Premier League", "2023/2024", (2024, 5, 19), "Arsenal", "Everton"),
            game("Premier League", "2022/2023", (2023, 4, 26), "Man City", "Arsenal")
                .with_score(4, 1),
            game("La Liga", "2023/2024", (2023, 8, 12), "Sevilla", "Valencia").with_score(1, 2),
        ]
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("home_win".parse::<ResultClass>(), Ok(ResultClass::HomeWin));
        assert_eq!("match_date_asc".parse::<SortOrder>(), Ok(SortOrder::MatchDateAsc));

        let err = "newest".parse::<SortOrder>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "sort must be one of [match_date_asc, match_date_desc], got 'newest'"
        );
        assert!("win".parse::<ResultClass>().is_err());
    }

    #[test]
    fn test_empty_filter_returns_all_newest_first() {
        let page = apply_filter(sample(), &MatchFilter::default());
        assert_eq!(page.total, 9);
        assert_eq!(page.items[0].home_team, "Arsenal");
        assert_eq!(page.items[0].away_team, "Everton");
    }

    #[test]
    fn test_season_prefix_and_exact() {
        let mut filter = MatchFilter::for_league("Premier League");
        filter.season = Some("2023".to_string());
        assert_eq!(apply_filter(sample(), &filter).total, 7);

        filter.season = Some(" 2022/2023 ".to_string());
        assert_eq!(apply_filter(sample(), &filter).total, 1);
    }

    #[test]
    fn test_team_and_opponent() {
        let filter = MatchFilter {
            team: Some("Arsenal".to_string()),
            opponent: Some("Man City".to_string()),
            ..Default::default()
        };
        let page = apply_filter(sample(), &filter);
        assert_eq!(page.total, 3);
        assert!(page.items.iter().all(|m| m.is_between("Arsenal", "Man City")));
    }

    #[test]
    fn test_result_filter_skips_unknown() {
        let filter = MatchFilter {
            team: Some("Arsenal".to_string()),
            result: Some(ResultClass::HomeWin),
            ..Default::default()
        };
        let page = apply_filter(sample(), &filter);
        assert_eq!(page.total, 4);
        assert!(page.items.iter().all(|m| m.home_goals.is_some()));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filter = MatchFilter {
            date_from: NaiveDate::from_ymd_opt(2023, 8, 12),
            date_to: NaiveDate::from_ymd_opt(2023, 8, 21),
            ..Default::default()
        };
        assert_eq!(apply_filter(sample(), &filter).total, 4);
    }

    #[test]
    fn test_ties_keep_storage_order() {
        let filter = MatchFilter {
            league: Some("Premier League".to_string()),
            date_to: NaiveDate::from_ymd_opt(2023, 8, 12),
            sort: SortOrder::MatchDateAsc,
            ..Default::default()
        };
        let page = apply_filter(sample(), &filter);
        let homes: Vec<&str> = page.items.iter().map(|m| m.home_team.as_str()).collect();
        assert_eq!(homes, vec!["Man City", "Arsenal", "Burnley"]);

        let desc = MatchFilter {
            sort: SortOrder::MatchDateDesc,
            ..filter
        };
        let page = apply_filter(sample(), &desc);
        let homes: Vec<&str> = page.items.iter().map(|m| m.home_team.as_str()).collect();
        assert_eq!(homes, vec!["Arsenal", "Burnley", "Man City"]);
    }

    #[test]
    fn test_paging_keeps_total() {
        let filter = MatchFilter {
            limit: Some(2),
            offset: 1,
            sort: SortOrder::MatchDateAsc,
            ..Default::default()
        };
        let page = apply_filter(sample(), &filter);
        assert_eq!(page.total, 9);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].home_team, "Arsenal");
        assert_eq!(page.items[0].match_date, NaiveDate::from_ymd_opt(2023, 8, 12).unwrap());
    }

    #[test]
    fn test_distinct() {
        let repo = MemoryMatchRepository::new(sample());
        let leagues = repo.distinct(DistinctField::League, &MatchFilter::default()).unwrap();
        assert_eq!(leagues, vec!["La Liga", "Premier League"]);

        let seasons = repo
            .distinct(DistinctField::Season, &MatchFilter::for_league("Premier League"))
            .unwrap();
        assert_eq!(seasons, vec!["2022/2023", "2023/2024"]);

        let teams = repo
            .distinct(DistinctField::Team, &MatchFilter::for_league("La Liga"))
            .unwrap();
        assert_eq!(teams, vec!["Sevilla", "Valencia"]);
    }

    #[test]
    fn test_get_and_count() {
        let records = sample();
        let id = records[3].id.clone();
        let repo = MemoryMatchRepository::new(records);

        assert_eq!(repo.get(&id).unwrap().unwrap().away_team, "Man United");
        assert!(repo.get(&MatchId::from("missing")).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 9);
    }

    #[test]
    fn test_jsonl_repository_reads_store() {
        let dir = TempDir::new().unwrap();
        let store = MatchStore::new(dir.path().join("matches.jsonl"));
        store.write_all(&sample()).unwrap();

        let repo = JsonlMatchRepository::new(store);
        assert_eq!(repo.count().unwrap(), 9);
        let page = repo.query(&MatchFilter::for_league("La Liga")).unwrap();
        assert_eq!(page.items[0].home_team, "Sevilla");
    }
}
