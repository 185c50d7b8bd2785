use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::routes::parse_session;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{DriverId, EventId, Prediction, UserId};

#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    pub user_id: String,
    pub event_id: EventId,
    pub session: String,
    /// Up to five driver ids in finishing order; null leaves a slot empty
    #[serde(default)]
    pub picks: Vec<Option<String>>,
}

pub async fn put_prediction(
    State(state): State<AppState>,
    Json(body): Json<PredictionRequest>,
) -> Result<Json<Prediction>, ApiError> {
    let session = parse_session(&body.session)?;
    let user_id = UserId::from(body.user_id);
    let event_id = body.event_id;
    let picks: Vec<Option<DriverId>> = body
        .picks
        .into_iter()
        .map(|pick| pick.map(DriverId::from))
        .collect();

    let _guard = state.write_lock.lock().await;
    let prediction = state
        .with_league(move |league| league.submit_prediction(&user_id, event_id, session, picks))
        .await?;
    Ok(Json(prediction))
}

#[derive(Debug, Deserialize)]
pub struct UserPredictionsParams {
    pub event: Option<EventId>,
}

#[derive(Debug, Serialize)]
pub struct UserPredictionsResponse {
    pub user_id: UserId,
    pub predictions: Vec<Prediction>,
}

pub async fn list_user_predictions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<UserPredictionsParams>,
) -> Result<Json<UserPredictionsResponse>, ApiError> {
    let user_id = UserId::from(id);
    let event = params.event;
    let predictions = {
        let user_id = user_id.clone();
        state
            .with_league(move |league| league.predictions_for(&user_id, event))
            .await?
    };

    Ok(Json(UserPredictionsResponse {
        user_id,
        predictions,
    }))
}
