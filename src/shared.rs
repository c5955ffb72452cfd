use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::TokenConfig;
use crate::event::EventBus;
use crate::locks::KeyedLocks;
use crate::matches::{repository::MatchRepository, service::MatchService};
use crate::player::{repository::PlayerRepository, service::PlayerService};
use crate::schedule::service::ScheduleService;
use crate::spirit::{repository::SpiritScoreRepository, service::SpiritService};
use crate::stats::StatsService;
use crate::team::{repository::TeamRepository, service::TeamService};
use crate::tournament::{repository::TournamentRepository, service::TournamentService};

/// Storage handles for every document collection
#[derive(Clone)]
pub struct Repositories {
    pub tournaments: Arc<dyn TournamentRepository + Send + Sync>,
    pub teams: Arc<dyn TeamRepository + Send + Sync>,
    pub matches: Arc<dyn MatchRepository + Send + Sync>,
    pub players: Arc<dyn PlayerRepository + Send + Sync>,
    pub spirit_scores: Arc<dyn SpiritScoreRepository + Send + Sync>,
}

impl Repositories {
    /// In-memory collections, used when no database is configured and in tests
    pub fn in_memory() -> Self {
        Self {
            tournaments: Arc::new(crate::tournament::repository::InMemoryTournamentRepository::new()),
            teams: Arc::new(crate::team::repository::InMemoryTeamRepository::new()),
            matches: Arc::new(crate::matches::repository::InMemoryMatchRepository::new()),
            players: Arc::new(crate::player::repository::InMemoryPlayerRepository::new()),
            spirit_scores: Arc::new(crate::spirit::repository::InMemorySpiritScoreRepository::new()),
        }
    }

    /// PostgreSQL-backed collections sharing one pool
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            tournaments: Arc::new(crate::tournament::repository::PostgresTournamentRepository::new(
                pool.clone(),
            )),
            teams: Arc::new(crate::team::repository::PostgresTeamRepository::new(pool.clone())),
            matches: Arc::new(crate::matches::repository::PostgresMatchRepository::new(
                pool.clone(),
            )),
            players: Arc::new(crate::player::repository::PostgresPlayerRepository::new(
                pool.clone(),
            )),
            spirit_scores: Arc::new(crate::spirit::repository::PostgresSpiritScoreRepository::new(
                pool,
            )),
        }
    }
}

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub tournament_service: Arc<TournamentService>,
    pub team_service: Arc<TeamService>,
    pub player_service: Arc<PlayerService>,
    pub match_service: Arc<MatchService>,
    pub schedule_service: Arc<ScheduleService>,
    pub spirit_service: Arc<SpiritService>,
    pub token_config: TokenConfig,
    pub event_bus: EventBus,
}

impl AppState {
    pub fn new(repositories: Repositories, token_config: TokenConfig, event_bus: EventBus) -> Self {
        // Every read-modify-write of a team or match document holds its lock here
        let team_locks = Arc::new(KeyedLocks::new());
        let match_locks = Arc::new(KeyedLocks::new());

        let stats_service = Arc::new(StatsService::new(
            Arc::clone(&repositories.teams),
            Arc::clone(&team_locks),
        ));

        let tournament_service = Arc::new(TournamentService::new(
            Arc::clone(&repositories.tournaments),
            Arc::clone(&repositories.teams),
            Arc::clone(&repositories.matches),
            Arc::clone(&team_locks),
            Arc::clone(&match_locks),
        ));
        let team_service = Arc::new(TeamService::new(
            Arc::clone(&repositories.teams),
            Arc::clone(&repositories.tournaments),
            Arc::clone(&repositories.players),
            team_locks,
        ));
        let player_service = Arc::new(PlayerService::new(Arc::clone(&repositories.players)));
        let match_service = Arc::new(MatchService::new(
            Arc::clone(&repositories.matches),
            Arc::clone(&repositories.teams),
            Arc::clone(&repositories.players),
            Arc::clone(&repositories.tournaments),
            stats_service,
            event_bus.clone(),
            match_locks,
        ));
        let schedule_service = Arc::new(ScheduleService::new(
            Arc::clone(&repositories.tournaments),
            Arc::clone(&repositories.teams),
            Arc::clone(&repositories.matches),
            event_bus.clone(),
        ));
        let spirit_service = Arc::new(SpiritService::new(
            Arc::clone(&repositories.spirit_scores),
            Arc::clone(&repositories.tournaments),
            Arc::clone(&repositories.teams),
            Arc::clone(&match_service),
        ));

        Self {
            tournament_service,
            team_service,
            player_service,
            match_service,
            schedule_service,
            spirit_service,
            token_config,
            event_bus,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}
