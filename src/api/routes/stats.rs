use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::{blocking, non_empty, parse_count, ApiError};
use crate::models::{HeadToHeadSummary, LeagueTable, TeamSeasonStats};

#[derive(Debug, Deserialize)]
pub struct TeamStatsParams {
    pub league: Option<String>,
    pub season: Option<String>,
    pub team: Option<String>,
    pub last_n: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HeadToHeadParams {
    pub league: Option<String>,
    pub season: Option<String>,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub last_n: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TableParams {
    pub league: Option<String>,
    pub season: Option<String>,
}

fn owned(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub async fn team_stats(
    State(state): State<AppState>,
    Query(params): Query<TeamStatsParams>,
) -> Result<Json<TeamSeasonStats>, ApiError> {
    let last_n = parse_count("last_n", params.last_n.as_deref())?;
    let (league, season, team) = (
        owned(&params.league),
        owned(&params.season),
        owned(&params.team),
    );

    let service = state.service.clone();
    let stats = blocking(move || service.team_stats(&league, &season, &team, last_n)).await?;
    Ok(Json(stats))
}

pub async fn head_to_head(
    State(state): State<AppState>,
    Query(params): Query<HeadToHeadParams>,
) -> Result<Json<HeadToHeadSummary>, ApiError> {
    let last_n = parse_count("last_n", params.last_n.as_deref())?;
    let season = non_empty(params.season.as_deref()).map(str::to_string);
    let (league, team_a, team_b) = (
        owned(&params.league),
        owned(&params.team_a),
        owned(&params.team_b),
    );

    let service = state.service.clone();
    let summary = blocking(move || {
        service.head_to_head(&league, season.as_deref(), &team_a, &team_b, last_n)
    })
    .await?;
    Ok(Json(summary))
}

pub async fn league_table(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> Result<Json<LeagueTable>, ApiError> {
    let (league, season) = (owned(&params.league), owned(&params.season));
    let service = state.service.clone();
    Ok(Json(blocking(move || service.league_table(&league, &season)).await?))
}
