use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{blocking, non_empty, parse_flag, ApiError};
use crate::names::TeamLabel;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SeasonsParams {
    pub league: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TeamsParams {
    pub league: Option<String>,
    pub season: Option<String>,
    pub pretty: Option<String>,
}

/// Raw stored names, or value/label pairs for pickers.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TeamsResponse {
    Raw(Vec<String>),
    Pretty(Vec<TeamLabel>),
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn count(State(state): State<AppState>) -> Result<Json<CountResponse>, ApiError> {
    let service = state.service.clone();
    let count = blocking(move || service.count()).await?;
    Ok(Json(CountResponse { count }))
}

pub async fn leagues(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let service = state.service.clone();
    Ok(Json(blocking(move || service.leagues()).await?))
}

pub async fn seasons(
    State(state): State<AppState>,
    Query(params): Query<SeasonsParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let league = non_empty(params.league.as_deref())
        .ok_or_else(|| ApiError::BadRequest("league is required".to_string()))?
        .to_string();
    let service = state.service.clone();
    Ok(Json(blocking(move || service.seasons(&league)).await?))
}

pub async fn teams(
    State(state): State<AppState>,
    Query(params): Query<TeamsParams>,
) -> Result<Json<TeamsResponse>, ApiError> {
    let league = non_empty(params.league.as_deref()).map(str::to_string);
    let season = non_empty(params.season.as_deref()).map(str::to_string);
    let pretty = parse_flag(params.pretty.as_deref());

    let service = state.service.clone();
    let names = blocking(move || service.teams(league.as_deref(), season.as_deref())).await?;

    if pretty {
        let labels = names.iter().map(|n| TeamLabel::new(n)).collect();
        Ok(Json(TeamsResponse::Pretty(labels)))
    } else {
        Ok(Json(TeamsResponse::Raw(names)))
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, app_with, get_json};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_count() {
        let (_, body) = get_json(app(), "/debug/count").await;
        assert_eq!(body["count"], 7);

        let (_, body) = get_json(app_with(vec![]), "/debug/count").await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_leagues_sorted() {
        let (status, body) = get_json(app(), "/leagues").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["La Liga", "Premier League"]));
    }

    #[tokio::test]
    async fn test_seasons_requires_league() {
        let (status, body) = get_json(app(), "/seasons").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(body["error"]["message"], "league is required");

        let (status, body) = get_json(app(), "/seasons?league=La%20Liga").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["2023/2024"]));
    }

    #[tokio::test]
    async fn test_teams_raw_and_pretty() {
        let (_, body) = get_json(app(), "/teams?league=Premier%20League").await;
        let names = body.as_array().unwrap();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "Arsenal");

        let (_, body) = get_json(app(), "/teams?league=Premier%20League&pretty=1").await;
        let wolves = body
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["value"] == "Wolves")
            .unwrap();
        assert_eq!(wolves["label"], "Wolverhampton Wanderers");
    }
}
