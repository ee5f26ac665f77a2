use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::{blocking, non_empty, parse_date, saturate_u32, ApiError};
use crate::models::PredictionResult;
use crate::service::PredictionRequest;

/// Request body as sent by clients. Dates arrive as strings so a bad one
/// gets the same message as a query parameter would.
#[derive(Debug, Deserialize)]
pub struct PredictBody {
    #[serde(default)]
    pub league: String,
    pub season: Option<String>,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    pub cutoff: Option<String>,
    pub mode: Option<String>,
    pub last_n: Option<i64>,
    pub last_days: Option<i64>,
}

impl PredictBody {
    fn into_request(self) -> Result<PredictionRequest, ApiError> {
        Ok(PredictionRequest {
            cutoff: parse_date("cutoff", self.cutoff.as_deref())?,
            mode: non_empty(self.mode.as_deref()).map(str::to_string),
            league: self.league,
            season: self.season,
            home_team: self.home_team,
            away_team: self.away_team,
            last_n: self.last_n.map(saturate_u32),
            last_days: self.last_days.map(saturate_u32),
        })
    }
}

pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictBody>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = body.into_request()?;

    let service = state.service.clone();
    Ok(Json(blocking(move || service.predict(&request)).await?))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, app_with, post_json};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_predict() {
        let body = r#"{"league":"Premier League","home_team":"Arsenal","away_team":"Wolves"}"#;
        let (status, json) = post_json(app(), "/predict", body).await;
        assert_eq!(status, StatusCode::OK);

        let total = json["p_home"].as_f64().unwrap()
            + json["p_draw"].as_f64().unwrap()
            + json["p_away"].as_f64().unwrap();
        assert!(total <= 1.0 + 1e-9 && total > 0.98);
        assert!(json["p_home"].as_f64().unwrap() > json["p_away"].as_f64().unwrap());
        assert_eq!(json["window"]["mode"], "last_n");
        assert_eq!(json["window"]["n"], 2000);
        assert_eq!(json["history_matches"], 5);
        assert!(json["most_likely_score"]["p"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_predict_with_cutoff_and_days() {
        let body = r#"{"league":"Premier League","home_team":"Arsenal","away_team":"Wolves",
                       "cutoff":"2023-09-01","mode":"last_days","last_days":30}"#;
        let (status, json) = post_json(app(), "/predict", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["cutoff"], "2023-09-01");
        assert_eq!(json["window"]["days"], 30);
        assert_eq!(json["history_matches"], 3);
    }

    #[tokio::test]
    async fn test_predict_empty_history_prior() {
        let body = r#"{"league":"Serie A","home_team":"Inter","away_team":"Milan"}"#;
        let (status, json) = post_json(app_with(vec![]), "/predict", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["lambda_home"], 1.2);
        assert_eq!(json["lambda_away"], 1.0);
        assert!(json["ratings"].is_null());
    }

    #[tokio::test]
    async fn test_predict_bad_requests() {
        let cases = [
            (
                r#"{"league":"Premier League","home_team":"Arsenal","away_team":"Arsenal"}"#,
                "home_team and away_team must be different teams",
            ),
            (
                r#"{"league":"Premier League","home_team":"Arsenal","away_team":"Wolves",
                    "cutoff":"01/09/2023"}"#,
                "cutoff must be YYYY-MM-DD",
            ),
            (
                r#"{"league":"Premier League","home_team":"Arsenal","away_team":"Wolves",
                    "cutoff":"-262143-01-01","mode":"last_days","last_days":3650}"#,
                "cutoff must be YYYY-MM-DD",
            ),
            (
                r#"{"league":"Premier League","home_team":"Arsenal","away_team":"Wolves",
                    "mode":"season"}"#,
                "mode must be one of [last_days, last_n], got 'season'",
            ),
            (
                r#"{"league":"Premier League","home_team":"Arsenal","away_team":"Wolves",
                    "last_n":0}"#,
                "last_n must be >= 1",
            ),
            (
                r#"{"league":"Premier League","home_team":"Arsenal","away_team":"Wolves",
                    "mode":"last_days"}"#,
                "last_days is required for mode last_days",
            ),
            (
                r#"{"home_team":"Arsenal","away_team":"Wolves"}"#,
                "league is required",
            ),
        ];
        for (body, message) in cases {
            let (status, json) = post_json(app(), "/predict", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
            assert_eq!(json["error"]["message"], message, "{}", body);
        }
    }

    #[tokio::test]
    async fn test_predict_malformed_json() {
        let (status, json) = post_json(app(), "/predict", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }
}
