use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use super::{
    models::TeamModel,
    types::{
        AddPlayerRequest, RosterLockRequest, TeamListQuery, TeamRegisterRequest,
        TeamStatusRequest, VerifyJerseysRequest,
    },
};
use crate::{
    auth::Caller,
    shared::{AppError, AppState},
};

/// POST /teams
#[instrument(name = "register_team", skip(state, request))]
pub async fn register_team(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<TeamRegisterRequest>,
) -> Result<(StatusCode, Json<TeamModel>), AppError> {
    let team = state.team_service.register_team(request, &caller).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// GET /teams?tournament_id=
#[instrument(name = "list_teams", skip(state))]
pub async fn list_teams(
    State(state): State<AppState>,
    Query(query): Query<TeamListQuery>,
) -> Result<Json<Vec<TeamModel>>, AppError> {
    let teams = state
        .team_service
        .list_teams(query.tournament_id.as_deref())
        .await?;
    info!(team_count = teams.len(), "Teams listed");
    Ok(Json(teams))
}

/// GET /teams/:id
#[instrument(name = "get_team", skip(state))]
pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<TeamModel>, AppError> {
    Ok(Json(state.team_service.get_team(&team_id).await?))
}

/// PUT /teams/:id/status
#[instrument(name = "set_team_status", skip(state))]
pub async fn set_team_status(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(team_id): Path<String>,
    Json(request): Json<TeamStatusRequest>,
) -> Result<Json<TeamModel>, AppError> {
    let team = state
        .team_service
        .set_status(&team_id, request.status, &caller)
        .await?;
    Ok(Json(team))
}

/// POST /teams/:id/roster
#[instrument(name = "add_player", skip(state, request))]
pub async fn add_player(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(team_id): Path<String>,
    Json(request): Json<AddPlayerRequest>,
) -> Result<Json<TeamModel>, AppError> {
    let team = state
        .team_service
        .add_player(&team_id, request, &caller)
        .await?;
    Ok(Json(team))
}

/// PUT /teams/:id/roster/lock
#[instrument(name = "lock_roster", skip(state))]
pub async fn lock_roster(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(team_id): Path<String>,
    Json(request): Json<RosterLockRequest>,
) -> Result<Json<TeamModel>, AppError> {
    let team = state
        .team_service
        .lock_roster(&team_id, request.locked, &caller)
        .await?;
    Ok(Json(team))
}

/// PUT /teams/:id/verify-jerseys
#[instrument(name = "verify_jerseys", skip(state, request))]
pub async fn verify_jerseys(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(team_id): Path<String>,
    Json(request): Json<VerifyJerseysRequest>,
) -> Result<Json<TeamModel>, AppError> {
    let team = state
        .team_service
        .verify_jerseys(&team_id, request.players, &caller)
        .await?;
    Ok(Json(team))
}
