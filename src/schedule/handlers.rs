use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::instrument;

use super::types::ScheduleRequest;
use crate::{
    auth::Caller,
    matches::models::MatchModel,
    shared::{AppError, AppState},
};

/// POST /tournaments/:id/schedule
#[instrument(name = "generate_schedule", skip(state, request))]
pub async fn generate_schedule(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(tournament_id): Path<String>,
    Json(request): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<Vec<MatchModel>>), AppError> {
    let matches = state
        .schedule_service
        .generate(&tournament_id, request, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(matches)))
}

/// POST /tournaments/:id/bracket/advance
#[instrument(name = "advance_bracket", skip(state))]
pub async fn advance_bracket(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(tournament_id): Path<String>,
) -> Result<(StatusCode, Json<Vec<MatchModel>>), AppError> {
    let matches = state
        .schedule_service
        .advance_bracket(&tournament_id, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(matches)))
}
