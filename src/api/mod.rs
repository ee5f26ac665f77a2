//! REST API endpoints.
//!
//! Axum-based HTTP API over the stats service: match listings, team and
//! head-to-head stats, league tables and predictions.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::CalcError;
use crate::storage::FilterError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        match err {
            CalcError::InvalidArgument(msg) => ApiError::BadRequest(msg),
            CalcError::NotFound(msg) => ApiError::NotFound(msg),
            // Already logged by the service; details stay server-side
            CalcError::Integrity(_) | CalcError::Storage(_) => {
                ApiError::Internal("internal computation error".to_string())
            }
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/health", get(routes::meta::health))
        .route("/debug/count", get(routes::meta::count))
        .route("/leagues", get(routes::meta::leagues))
        .route("/seasons", get(routes::meta::seasons))
        .route("/teams", get(routes::meta::teams))
        .route("/matches", get(routes::matches::list_matches))
        .route("/matches/:id", get(routes::matches::get_match))
        .route("/teams/stats", get(routes::stats::team_stats))
        .route("/h2h", get(routes::stats::head_to_head))
        .route("/table", get(routes::stats::league_table))
        .route("/predict", post(routes::predict::predict))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin.trim() == "*" {
        return layer.allow_origin(Any);
    }
    match origin.trim().parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(e) => {
            tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            layer
        }
    }
}

/// Run an engine call off the async reactor.
pub async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, CalcError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("worker task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Treat an empty query parameter as absent.
pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an optional integer query parameter within bounds.
pub fn parse_int(
    name: &str,
    raw: Option<&str>,
    min: Option<i64>,
    max: Option<i64>,
) -> Result<Option<i64>, ApiError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    let value: i64 = raw
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("{} must be an integer", name)))?;
    if let Some(min) = min.filter(|&min| value < min) {
        return Err(ApiError::BadRequest(format!("{} must be >= {}", name, min)));
    }
    if let Some(max) = max.filter(|&max| value > max) {
        return Err(ApiError::BadRequest(format!("{} must be <= {}", name, max)));
    }
    Ok(Some(value))
}

/// Integer count handed to the engine, which owns the bounds check.
/// Out-of-range values saturate so the engine reports them.
pub fn parse_count(name: &str, raw: Option<&str>) -> Result<Option<u32>, ApiError> {
    Ok(parse_int(name, raw, None, None)?.map(saturate_u32))
}

pub fn saturate_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Parse an optional `YYYY-MM-DD` parameter.
pub fn parse_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    let invalid = || ApiError::BadRequest(format!("{} must be YYYY-MM-DD", name));
    // chrono also takes signed and short years
    let shaped = raw.len() == 10
        && raw
            .bytes()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() });
    if !shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| invalid())
}

/// `1`, `true` and `yes` switch a flag on.
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        non_empty(raw).map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes")
    )
}
