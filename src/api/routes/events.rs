use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::league::League;
use crate::models::{CommunityReport, DriverId, Event, EventId, EventStatus, Session};

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session: Session,
    pub open: bool,
    pub scored: bool,
}

#[derive(Debug, Serialize)]
pub struct EventSummary {
    pub id: EventId,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub sprint: bool,
    pub status: EventStatus,
    pub sessions: Vec<SessionSummary>,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        let sessions = event
            .sessions()
            .iter()
            .map(|&session| SessionSummary {
                session,
                open: event.is_session_open(session),
                scored: event.result_for(session).is_some(),
            })
            .collect();

        Self {
            id: event.id,
            name: event.name.clone(),
            date: event.date,
            sprint: event.sprint,
            status: event.status,
            sessions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub league: String,
    pub events: Vec<EventSummary>,
}

pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<EventListResponse>, ApiError> {
    let calendar = state.with_league(League::calendar).await?;

    Ok(Json(EventListResponse {
        league: state.league_name.clone(),
        events: calendar.iter().map(EventSummary::from).collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub summary: EventSummary,
    pub results: BTreeMap<Session, Vec<DriverId>>,
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<Json<EventDetailResponse>, ApiError> {
    let event = state.with_league(move |league| league.event(id)).await?;

    Ok(Json(EventDetailResponse {
        summary: EventSummary::from(&event),
        results: event.results.clone(),
    }))
}

pub async fn get_community(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<Json<CommunityReport>, ApiError> {
    let report = state.with_league(move |league| league.community(id)).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get_json, send, setup};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_events_shows_sessions_per_weekend() {
        let (_dir, _state, app) = setup();
        let (status, json) = get_json(app, "/api/events").await;

        assert_eq!(status, StatusCode::OK);
        let events = json["events"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["sessions"].as_array().unwrap().len(), 2);
        assert_eq!(events[1]["sessions"].as_array().unwrap().len(), 4);
        assert_eq!(events[1]["sessions"][0]["session"], "QualifyingSprint");
        assert_eq!(events[1]["sessions"][0]["open"], true);
        assert_eq!(events[0]["status"], "UPCOMING");
    }

    #[tokio::test]
    async fn test_get_event_not_found() {
        let (_dir, _state, app) = setup();
        let (status, json) = get_json(app, "/api/events/42").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_event_includes_results() {
        let (_dir, _state, app) = setup();
        let (status, _) = send(
            app.clone(),
            "PUT",
            "/api/events/1/results/RaceMain",
            Some(r#"{"top5":["norris","piastri","verstappen","leclerc","russell"]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = get_json(app, "/api/events/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Australian Grand Prix");
        assert_eq!(json["results"]["RaceMain"][0], "norris");
        assert_eq!(json["sessions"][1]["scored"], true);
    }

    #[tokio::test]
    async fn test_community_for_event() {
        let (_dir, state, app) = setup();
        let user = state.league.register_user("Ana").unwrap();
        let body = format!(
            r#"{{"user_id":"{}","event_id":1,"session":"RaceMain","picks":["norris","piastri"]}}"#,
            user.id
        );
        let (status, _) = send(app.clone(), "PUT", "/api/predictions", Some(&body)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = get_json(app, "/api/events/1/community").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["participants"], 1);
        assert_eq!(json["sessions"]["RaceMain"][0]["count"], 1);
        assert_eq!(json["sessions"]["RaceMain"][0]["percent"], 100.0);
    }
}
