use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{blocking, non_empty, parse_date, parse_int, ApiError};
use crate::models::{MatchId, MatchRecord};
use crate::storage::{MatchFilter, ResultClass, SortOrder};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct ListMatchesParams {
    pub league: Option<String>,
    pub season: Option<String>,
    pub team: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub result: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Filters as applied, echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct AppliedFilters {
    pub league: Option<String>,
    pub season: Option<String>,
    pub team: Option<String>,
    pub date_from: Option<chrono::NaiveDate>,
    pub date_to: Option<chrono::NaiveDate>,
    pub result: Option<ResultClass>,
    pub sort: SortOrder,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub items: Vec<MatchRecord>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub filters: AppliedFilters,
}

impl ListMatchesParams {
    fn to_filter(&self) -> Result<MatchFilter, ApiError> {
        let owned = |v: &Option<String>| non_empty(v.as_deref()).map(str::to_string);

        let limit = parse_int("limit", self.limit.as_deref(), Some(1), Some(MAX_LIMIT))?
            .unwrap_or(DEFAULT_LIMIT);
        let offset = parse_int("offset", self.offset.as_deref(), Some(0), None)?.unwrap_or(0);
        let result = non_empty(self.result.as_deref())
            .map(str::parse::<ResultClass>)
            .transpose()?;
        let sort = non_empty(self.sort.as_deref())
            .map(str::parse::<SortOrder>)
            .transpose()?
            .unwrap_or_default();

        Ok(MatchFilter {
            league: owned(&self.league),
            season: owned(&self.season),
            team: owned(&self.team),
            opponent: None,
            date_from: parse_date("date_from", self.date_from.as_deref())?,
            date_to: parse_date("date_to", self.date_to.as_deref())?,
            result,
            sort,
            limit: Some(limit as usize),
            offset: offset as usize,
        })
    }
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListMatchesParams>,
) -> Result<Json<MatchListResponse>, ApiError> {
    let filter = params.to_filter()?;

    let service = state.service.clone();
    let query = filter.clone();
    let page = blocking(move || service.matches(&query)).await?;

    Ok(Json(MatchListResponse {
        items: page.items,
        total: page.total,
        limit: filter.limit.unwrap_or(DEFAULT_LIMIT as usize),
        offset: filter.offset,
        filters: AppliedFilters {
            league: filter.league,
            season: filter.season,
            team: filter.team,
            date_from: filter.date_from,
            date_to: filter.date_to,
            result: filter.result,
            sort: filter.sort,
        },
    }))
}

pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MatchRecord>, ApiError> {
    let id = MatchId::from(id);
    let service = state.service.clone();
    Ok(Json(blocking(move || service.get_match(&id)).await?))
}
