use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::TournamentModel;
use crate::shared::AppError;

/// Trait for tournament repository operations
#[async_trait]
pub trait TournamentRepository {
    async fn create_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError>;
    async fn get_tournament(&self, tournament_id: &str)
        -> Result<Option<TournamentModel>, AppError>;
    /// All tournaments, most recent start date first
    async fn list_tournaments(&self) -> Result<Vec<TournamentModel>, AppError>;
    async fn update_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError>;
    async fn delete_tournament(&self, tournament_id: &str) -> Result<(), AppError>;
}

/// In-memory implementation of TournamentRepository for development and testing
pub struct InMemoryTournamentRepository {
    tournaments: Mutex<HashMap<String, TournamentModel>>,
}

impl Default for InMemoryTournamentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTournamentRepository {
    pub fn new() -> Self {
        Self {
            tournaments: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl TournamentRepository for InMemoryTournamentRepository {
    #[instrument(skip(self, tournament))]
    async fn create_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError> {
        debug!(tournament_id = %tournament.id, name = %tournament.name, "Creating tournament in memory");

        let mut tournaments = self.tournaments.lock().unwrap();
        if tournaments.contains_key(&tournament.id) {
            warn!(tournament_id = %tournament.id, "Tournament already exists in memory");
            return Err(AppError::DatabaseError(
                "Tournament already exists".to_string(),
            ));
        }
        tournaments.insert(tournament.id.clone(), tournament.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_tournament(
        &self,
        tournament_id: &str,
    ) -> Result<Option<TournamentModel>, AppError> {
        let tournaments = self.tournaments.lock().unwrap();
        Ok(tournaments.get(tournament_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_tournaments(&self) -> Result<Vec<TournamentModel>, AppError> {
        let tournaments = self.tournaments.lock().unwrap();
        let mut list: Vec<TournamentModel> = tournaments.values().cloned().collect();
        list.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    #[instrument(skip(self, tournament))]
    async fn update_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError> {
        let mut tournaments = self.tournaments.lock().unwrap();
        match tournaments.get_mut(&tournament.id) {
            Some(existing) => {
                *existing = tournament.clone();
                Ok(())
            }
            None => {
                warn!(tournament_id = %tournament.id, "Tournament not found for update in memory");
                Err(AppError::NotFound("Tournament not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_tournament(&self, tournament_id: &str) -> Result<(), AppError> {
        let mut tournaments = self.tournaments.lock().unwrap();
        if tournaments.remove(tournament_id).is_none() {
            return Err(AppError::NotFound("Tournament not found".to_string()));
        }
        Ok(())
    }
}

/// PostgreSQL implementation storing tournaments as JSONB documents
pub struct PostgresTournamentRepository {
    pool: PgPool,
}

impl PostgresTournamentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TournamentRepository for PostgresTournamentRepository {
    #[instrument(skip(self, tournament))]
    async fn create_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError> {
        sqlx::query("INSERT INTO tournaments (id, doc) VALUES ($1, $2)")
            .bind(&tournament.id)
            .bind(Json(tournament))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create tournament in database");
                AppError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_tournament(
        &self,
        tournament_id: &str,
    ) -> Result<Option<TournamentModel>, AppError> {
        let row = sqlx::query("SELECT doc FROM tournaments WHERE id = $1")
            .bind(tournament_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let Json(tournament) = row.try_get::<Json<TournamentModel>, _>("doc")?;
                Ok(Some(tournament))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list_tournaments(&self) -> Result<Vec<TournamentModel>, AppError> {
        let rows = sqlx::query("SELECT doc FROM tournaments ORDER BY doc->>'start_date' DESC, id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                row.try_get::<Json<TournamentModel>, _>("doc")
                    .map(|Json(t)| t)
                    .map_err(AppError::from)
            })
            .collect()
    }

    #[instrument(skip(self, tournament))]
    async fn update_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE tournaments SET doc = $2 WHERE id = $1")
            .bind(&tournament.id)
            .bind(Json(tournament))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tournament not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_tournament(&self, tournament_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
            .bind(tournament_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tournament not found".to_string()));
        }
        Ok(())
    }
}
