use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{instrument, warn};

use super::models::PlayerModel;
use crate::shared::AppError;

const DUPLICATE_EMAIL: &str = "A player with this email is already registered";

/// Trait for player repository operations
#[async_trait]
pub trait PlayerRepository {
    /// Fails with `Conflict` when another profile uses the same email
    async fn create_player(&self, player: &PlayerModel) -> Result<(), AppError>;
    async fn get_player(&self, player_id: &str) -> Result<Option<PlayerModel>, AppError>;
    /// Players sorted by name
    async fn list_players(&self) -> Result<Vec<PlayerModel>, AppError>;
    /// Fails with `Conflict` when the new email belongs to another profile
    async fn update_player(&self, player: &PlayerModel) -> Result<(), AppError>;
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// In-memory implementation of PlayerRepository for development and testing
pub struct InMemoryPlayerRepository {
    players: Mutex<HashMap<String, PlayerModel>>,
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self {
            players: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    #[instrument(skip(self, player), fields(player_id = %player.id))]
    async fn create_player(&self, player: &PlayerModel) -> Result<(), AppError> {
        let mut players = self.players.lock().unwrap();
        if players.values().any(|existing| existing.same_email(&player.email)) {
            warn!("Duplicate player email");
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }
        if players.contains_key(&player.id) {
            return Err(AppError::DatabaseError("Player already exists".to_string()));
        }
        players.insert(player.id.clone(), player.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: &str) -> Result<Option<PlayerModel>, AppError> {
        let players = self.players.lock().unwrap();
        Ok(players.get(player_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_players(&self) -> Result<Vec<PlayerModel>, AppError> {
        let players = self.players.lock().unwrap();
        let mut list: Vec<PlayerModel> = players.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    #[instrument(skip(self, player), fields(player_id = %player.id))]
    async fn update_player(&self, player: &PlayerModel) -> Result<(), AppError> {
        let mut players = self.players.lock().unwrap();
        let clash = players
            .values()
            .any(|existing| existing.id != player.id && existing.same_email(&player.email));
        if clash {
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }
        match players.get_mut(&player.id) {
            Some(existing) => {
                *existing = player.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("Player not found".to_string())),
        }
    }
}

/// PostgreSQL implementation storing players as JSONB documents
pub struct PostgresPlayerRepository {
    pool: PgPool,
}

impl PostgresPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(DUPLICATE_EMAIL.to_string())
        }
        _ => {
            warn!(error = %e, "Failed to write player");
            AppError::DatabaseError(e.to_string())
        }
    }
}

#[async_trait]
impl PlayerRepository for PostgresPlayerRepository {
    #[instrument(skip(self, player), fields(player_id = %player.id))]
    async fn create_player(&self, player: &PlayerModel) -> Result<(), AppError> {
        sqlx::query("INSERT INTO players (id, email, doc) VALUES ($1, $2, $3)")
            .bind(&player.id)
            .bind(email_key(&player.email))
            .bind(Json(player))
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: &str) -> Result<Option<PlayerModel>, AppError> {
        let row = sqlx::query("SELECT doc FROM players WHERE id = $1")
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let Json(player) = row.try_get::<Json<PlayerModel>, _>("doc")?;
                Ok(Some(player))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list_players(&self) -> Result<Vec<PlayerModel>, AppError> {
        let rows = sqlx::query("SELECT doc FROM players ORDER BY doc->>'name', id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                row.try_get::<Json<PlayerModel>, _>("doc")
                    .map(|Json(player)| player)
                    .map_err(AppError::from)
            })
            .collect()
    }

    #[instrument(skip(self, player), fields(player_id = %player.id))]
    async fn update_player(&self, player: &PlayerModel) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE players SET email = $2, doc = $3 WHERE id = $1")
            .bind(&player.id)
            .bind(email_key(&player.email))
            .bind(Json(player))
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Player not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::models::Gender;

    fn player(name: &str, email: &str) -> PlayerModel {
        PlayerModel::new(name.to_string(), 20, Gender::Other, email.to_string(), "m".to_string())
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let repo = InMemoryPlayerRepository::new();
        repo.create_player(&player("Ash", "ash@example.org")).await.unwrap();

        let result = repo.create_player(&player("Ash Two", "ASH@example.org")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(repo.list_players().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_cannot_take_another_players_email() {
        let repo = InMemoryPlayerRepository::new();
        let first = player("Ash", "ash@example.org");
        let mut second = player("Bay", "bay@example.org");
        repo.create_player(&first).await.unwrap();
        repo.create_player(&second).await.unwrap();

        second.email = "ash@example.org".to_string();
        let result = repo.update_player(&second).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        second.email = "bay@example.com".to_string();
        repo.update_player(&second).await.unwrap();
        let stored = repo.get_player(&second.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "bay@example.com");
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let repo = InMemoryPlayerRepository::new();
        repo.create_player(&player("Cam", "cam@example.org")).await.unwrap();
        repo.create_player(&player("Ash", "ash@example.org")).await.unwrap();

        let names: Vec<String> = repo
            .list_players()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Ash", "Cam"]);
    }
}
