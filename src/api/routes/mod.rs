pub mod admin;
pub mod events;
pub mod leaderboard;
pub mod predictions;
pub mod users;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Session;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub league: String,
    pub version: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        league: state.league_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Parse a session path segment such as `RaceMain`.
pub(crate) fn parse_session(raw: &str) -> Result<Session, ApiError> {
    raw.parse::<Session>().map_err(ApiError::BadRequest)
}
