use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use super::{
    models::PlayerModel,
    types::{PlayerRegisterRequest, PlayerUpdateRequest},
};
use crate::{
    auth::Caller,
    shared::{AppError, AppState},
};

/// POST /players
#[instrument(name = "register_player", skip(state, request))]
pub async fn register_player(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<PlayerRegisterRequest>,
) -> Result<(StatusCode, Json<PlayerModel>), AppError> {
    let player = state.player_service.register_player(request, &caller).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// GET /players
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerModel>>, AppError> {
    let players = state.player_service.list_players().await?;
    info!(player_count = players.len(), "Players listed");
    Ok(Json(players))
}

/// GET /players/:id
#[instrument(name = "get_player", skip(state))]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerModel>, AppError> {
    Ok(Json(state.player_service.get_player(&player_id).await?))
}

/// PUT /players/:id
#[instrument(name = "update_player", skip(state, request))]
pub async fn update_player(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(player_id): Path<String>,
    Json(request): Json<PlayerUpdateRequest>,
) -> Result<Json<PlayerModel>, AppError> {
    let player = state
        .player_service
        .update_player(&player_id, request, &caller)
        .await?;
    Ok(Json(player))
}
