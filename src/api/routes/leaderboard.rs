use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::league::League;
use crate::models::LeaderboardEntry;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub league: String,
    pub entries: Vec<LeaderboardEntry>,
    pub pagination: PaginationMeta,
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let entries = state.with_league(League::leaderboard).await?;

    let pagination = Pagination::new(params.page, params.page_size);
    let meta = PaginationMeta::new(&pagination, entries.len() as u32);

    Ok(Json(LeaderboardResponse {
        league: state.league_name.clone(),
        entries: pagination.page_of(&entries).to_vec(),
        pagination: meta,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get_json, setup};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_empty_leaderboard() {
        let (_dir, _state, app) = setup();
        let (status, json) = get_json(app, "/api/leaderboard").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["entries"].as_array().unwrap().is_empty());
        assert_eq!(json["pagination"]["total_items"], 0);
    }

    #[tokio::test]
    async fn test_leaderboard_pagination() {
        let (_dir, state, app) = setup();
        for name in ["Ana", "Ben", "Cy"] {
            state.league.register_user(name).unwrap();
        }
        state.league.run_scoring_pass().unwrap();

        let (status, json) = get_json(app, "/api/leaderboard?page=2&page_size=2").await;
        assert_eq!(status, StatusCode::OK);
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["display_name"], "Cy");
        assert_eq!(entries[0]["rank"], 3);
        assert_eq!(json["pagination"]["has_prev"], true);
    }

    #[tokio::test]
    async fn test_leaderboard_page_far_past_the_end() {
        let (_dir, state, app) = setup();
        state.league.register_user("Ana").unwrap();

        let (status, json) =
            get_json(app, "/api/leaderboard?page=50000000&page_size=100").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["entries"].as_array().unwrap().is_empty());
        assert_eq!(json["pagination"]["has_next"], false);
    }
}
