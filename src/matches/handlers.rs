use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use super::{
    models::{MatchFilter, MatchModel},
    types::{MatchCreateRequest, MatchUpdateRequest, ScoreUpdateRequest, ScoringEventRequest},
};
use crate::{
    auth::Caller,
    shared::{AppError, AppState},
};

/// POST /matches
#[instrument(name = "create_match", skip(state, request))]
pub async fn create_match(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<MatchCreateRequest>,
) -> Result<(StatusCode, Json<MatchModel>), AppError> {
    let model = state.match_service.create_match(request, &caller).await?;
    Ok((StatusCode::CREATED, Json(model)))
}

/// GET /matches?tournament_id=&team_id=&status=&date=
#[instrument(name = "list_matches", skip(state))]
pub async fn list_matches(
    State(state): State<AppState>,
    Query(filter): Query<MatchFilter>,
) -> Result<Json<Vec<MatchModel>>, AppError> {
    let matches = state.match_service.list_matches(&filter).await?;
    info!(match_count = matches.len(), "Matches listed");
    Ok(Json(matches))
}

/// GET /matches/:id
#[instrument(name = "get_match", skip(state))]
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchModel>, AppError> {
    Ok(Json(state.match_service.get_match(&match_id).await?))
}

/// PUT /matches/:id
#[instrument(name = "update_match", skip(state, request))]
pub async fn update_match(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(match_id): Path<String>,
    Json(request): Json<MatchUpdateRequest>,
) -> Result<Json<MatchModel>, AppError> {
    let model = state
        .match_service
        .update_match(&match_id, request, &caller)
        .await?;
    Ok(Json(model))
}

/// PUT /matches/:id/score
#[instrument(name = "update_score", skip(state))]
pub async fn update_score(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(match_id): Path<String>,
    Json(request): Json<ScoreUpdateRequest>,
) -> Result<Json<MatchModel>, AppError> {
    let model = state
        .match_service
        .update_score(&match_id, request, &caller)
        .await?;
    Ok(Json(model))
}

/// POST /matches/:id/score-event
#[instrument(name = "add_scoring_event", skip(state))]
pub async fn add_scoring_event(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(match_id): Path<String>,
    Json(request): Json<ScoringEventRequest>,
) -> Result<Json<MatchModel>, AppError> {
    let model = state
        .match_service
        .add_scoring_event(&match_id, request, &caller)
        .await?;
    Ok(Json(model))
}
