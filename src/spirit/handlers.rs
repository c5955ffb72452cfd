use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::instrument;

use super::{
    models::SpiritScoreModel,
    types::{SpiritScoreRequest, TeamSpiritScores},
};
use crate::{
    auth::Caller,
    shared::{AppError, AppState},
};

/// POST /spirit-scores
#[instrument(name = "submit_spirit_score", skip(state, request))]
pub async fn submit_spirit_score(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<SpiritScoreRequest>,
) -> Result<(StatusCode, Json<SpiritScoreModel>), AppError> {
    let score = state.spirit_service.submit(request, &caller).await?;
    Ok((StatusCode::CREATED, Json(score)))
}

/// GET /spirit-scores/team/:team_id
#[instrument(name = "team_spirit_scores", skip(state))]
pub async fn team_spirit_scores(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<TeamSpiritScores>, AppError> {
    Ok(Json(state.spirit_service.team_scores(&team_id).await?))
}

/// GET /spirit-scores/match/:match_id
#[instrument(name = "match_spirit_scores", skip(state))]
pub async fn match_spirit_scores(
    State(state): State<AppState>,
    Extension(_caller): Extension<Caller>,
    Path(match_id): Path<String>,
) -> Result<Json<Vec<SpiritScoreModel>>, AppError> {
    Ok(Json(state.spirit_service.match_scores(&match_id).await?))
}
