//! Administrator routes: official results, session flags, scoring trigger.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::routes::parse_session;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::league::League;
use crate::models::{DriverId, Event, EventId, ScoringPassSummary};

#[derive(Debug, Deserialize)]
pub struct ResultsRequest {
    pub top5: Vec<String>,
}

pub async fn put_results(
    State(state): State<AppState>,
    Path((id, session)): Path<(EventId, String)>,
    Json(body): Json<ResultsRequest>,
) -> Result<Json<Event>, ApiError> {
    let session = parse_session(&session)?;
    let top5: Vec<DriverId> = body.top5.into_iter().map(DriverId::from).collect();

    let _guard = state.write_lock.lock().await;
    let event = state
        .with_league(move |league| league.enter_results(id, session, top5))
        .await?;
    Ok(Json(event))
}

#[derive(Debug, Deserialize)]
pub struct SessionStatusRequest {
    pub open: bool,
}

pub async fn put_session_status(
    State(state): State<AppState>,
    Path((id, session)): Path<(EventId, String)>,
    Json(body): Json<SessionStatusRequest>,
) -> Result<Json<Event>, ApiError> {
    let session = parse_session(&session)?;

    let _guard = state.write_lock.lock().await;
    let open = body.open;
    let event = state
        .with_league(move |league| league.set_session_open(id, session, open))
        .await?;
    Ok(Json(event))
}

/// Run a full scoring pass. Refused while another write holds the lock.
pub async fn run_scoring(
    State(state): State<AppState>,
) -> Result<Json<ScoringPassSummary>, ApiError> {
    let _guard = state
        .write_lock
        .try_lock()
        .map_err(|_| ApiError::Conflict("another write is in progress".to_string()))?;

    let summary = state.with_league(League::run_scoring_pass).await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get_json, send, setup};
    use axum::http::StatusCode;

    const RESULT: &str = r#"{"top5":["norris","piastri","verstappen","leclerc","russell"]}"#;

    #[tokio::test]
    async fn test_put_results_rejects_short_list() {
        let (_dir, _state, app) = setup();
        let (status, json) = send(
            app,
            "PUT",
            "/api/events/1/results/RaceMain",
            Some(r#"{"top5":["norris","piastri"]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_put_results_rejects_unknown_or_foreign_session() {
        let (_dir, _state, app) = setup();

        let (status, _) = send(
            app.clone(),
            "PUT",
            "/api/events/1/results/Practice",
            Some(RESULT),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app, "PUT", "/api/events/1/results/RaceSprint", Some(RESULT)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_close_session() {
        let (_dir, _state, app) = setup();
        let (status, json) = send(
            app,
            "PUT",
            "/api/events/2/sessions/RaceSprint/status",
            Some(r#"{"open":false}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["session_status"]["RaceSprint"], false);
    }

    #[tokio::test]
    async fn test_scoring_pass_updates_leaderboard() {
        let (_dir, state, app) = setup();
        let ana = state.league.register_user("Ana").unwrap();
        let ben = state.league.register_user("Ben").unwrap();

        for (user, picks) in [
            (&ana, r#"["norris","verstappen","piastri","russell","leclerc"]"#),
            (&ben, r#"["norris","piastri","verstappen","leclerc","russell"]"#),
        ] {
            let body = format!(
                r#"{{"user_id":"{}","event_id":1,"session":"RaceMain","picks":{}}}"#,
                user.id, picks
            );
            let (status, _) = send(app.clone(), "PUT", "/api/predictions", Some(&body)).await;
            assert_eq!(status, StatusCode::OK);
        }
        send(
            app.clone(),
            "PUT",
            "/api/events/1/results/RaceMain",
            Some(RESULT),
        )
        .await;

        let (status, json) = send(app.clone(), "POST", "/api/admin/score", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["users_scored"], 2);
        assert_eq!(json["leader"], ben.id.as_str());

        let (_, json) = get_json(app, "/api/leaderboard").await;
        assert_eq!(json["entries"][0]["display_name"], "Ben");
        assert_eq!(json["entries"][0]["points"], 25);
        assert_eq!(json["entries"][1]["points"], 9);
        assert_eq!(json["entries"][1]["rank"], 2);
    }

    #[tokio::test]
    async fn test_scoring_refused_while_write_in_progress() {
        let (_dir, state, app) = setup();
        let _held = state.write_lock.lock().await;

        let (status, json) = send(app, "POST", "/api/admin/score", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "CONFLICT");
    }
}
