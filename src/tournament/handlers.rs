use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use super::{
    models::TournamentModel,
    types::{
        AnnouncementCreateRequest, DeletedResponse, FieldCreateRequest, StandingsQuery,
        TournamentCreateRequest, TournamentUpdateRequest,
    },
};
use crate::{
    auth::Caller,
    shared::{AppError, AppState},
    stats::standings::StandingRow,
};

/// POST /tournaments
#[instrument(name = "create_tournament", skip(state, request))]
pub async fn create_tournament(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<TournamentCreateRequest>,
) -> Result<(StatusCode, Json<TournamentModel>), AppError> {
    let tournament = state
        .tournament_service
        .create_tournament(request, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// GET /tournaments
#[instrument(name = "list_tournaments", skip(state))]
pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<Vec<TournamentModel>>, AppError> {
    let tournaments = state.tournament_service.list_tournaments().await?;
    info!(tournament_count = tournaments.len(), "Tournaments listed");
    Ok(Json(tournaments))
}

/// GET /tournaments/:id
#[instrument(name = "get_tournament", skip(state))]
pub async fn get_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
) -> Result<Json<TournamentModel>, AppError> {
    let tournament = state
        .tournament_service
        .get_tournament(&tournament_id)
        .await?;
    Ok(Json(tournament))
}

/// PUT /tournaments/:id
#[instrument(name = "update_tournament", skip(state, request))]
pub async fn update_tournament(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(tournament_id): Path<String>,
    Json(request): Json<TournamentUpdateRequest>,
) -> Result<Json<TournamentModel>, AppError> {
    let tournament = state
        .tournament_service
        .update_tournament(&tournament_id, request, &caller)
        .await?;
    Ok(Json(tournament))
}

/// DELETE /tournaments/:id
#[instrument(name = "delete_tournament", skip(state))]
pub async fn delete_tournament(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(tournament_id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    state
        .tournament_service
        .delete_tournament(&tournament_id, &caller)
        .await?;
    Ok(Json(DeletedResponse {
        message: "Tournament removed".to_string(),
    }))
}

/// POST /tournaments/:id/fields
#[instrument(name = "add_field", skip(state, request))]
pub async fn add_field(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(tournament_id): Path<String>,
    Json(request): Json<FieldCreateRequest>,
) -> Result<(StatusCode, Json<TournamentModel>), AppError> {
    let tournament = state
        .tournament_service
        .add_field(&tournament_id, request, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// POST /tournaments/:id/announcements
#[instrument(name = "add_announcement", skip(state, request))]
pub async fn add_announcement(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(tournament_id): Path<String>,
    Json(request): Json<AnnouncementCreateRequest>,
) -> Result<(StatusCode, Json<TournamentModel>), AppError> {
    let tournament = state
        .tournament_service
        .add_announcement(&tournament_id, request, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// GET /tournaments/:id/standings?order=results|spirit
#[instrument(name = "get_standings", skip(state))]
pub async fn get_standings(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
    Query(query): Query<StandingsQuery>,
) -> Result<Json<Vec<StandingRow>>, AppError> {
    let standings = state
        .tournament_service
        .standings(&tournament_id, query.order)
        .await?;
    Ok(Json(standings))
}
