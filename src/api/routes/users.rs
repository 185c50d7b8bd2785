use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{EventScore, User, UserId};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub display_name: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let _guard = state.write_lock.lock().await;
    let user = state
        .with_league(move |league| league.register_user(&body.display_name))
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub deleted: UserId,
    pub predictions_removed: usize,
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    let user_id = UserId::from(id);

    let _guard = state.write_lock.lock().await;
    let predictions_removed = {
        let user_id = user_id.clone();
        state
            .with_league(move |league| league.delete_user(&user_id))
            .await?
    };
    Ok(Json(DeleteUserResponse {
        deleted: user_id,
        predictions_removed,
    }))
}

#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub user_id: UserId,
    pub total: u32,
    pub events: Vec<EventScore>,
}

pub async fn get_breakdown(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BreakdownResponse>, ApiError> {
    let user_id = UserId::from(id);
    let events = {
        let user_id = user_id.clone();
        state
            .with_league(move |league| league.breakdown(&user_id))
            .await?
    };
    let total: u32 = events.iter().map(|e| e.total.points).sum();

    Ok(Json(BreakdownResponse {
        user_id,
        total,
        events,
    }))
}
