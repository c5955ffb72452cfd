use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{MatchFilter, MatchModel};
use crate::shared::AppError;

/// Trait for match repository operations
#[async_trait]
pub trait MatchRepository {
    async fn create_match(&self, model: &MatchModel) -> Result<(), AppError>;
    /// Stores a generated batch; nothing is stored if any id already exists
    async fn create_matches(&self, models: &[MatchModel]) -> Result<(), AppError>;
    async fn get_match(&self, match_id: &str) -> Result<Option<MatchModel>, AppError>;
    /// Matches accepted by `filter`, ordered by start time
    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchModel>, AppError>;
    async fn update_match(&self, model: &MatchModel) -> Result<(), AppError>;
    async fn delete_match(&self, match_id: &str) -> Result<(), AppError>;
}

/// In-memory implementation of MatchRepository for development and testing
pub struct InMemoryMatchRepository {
    matches: Mutex<HashMap<String, MatchModel>>,
}

impl Default for InMemoryMatchRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self {
            matches: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    #[instrument(skip(self, model), fields(match_id = %model.id))]
    async fn create_match(&self, model: &MatchModel) -> Result<(), AppError> {
        self.create_matches(std::slice::from_ref(model)).await
    }

    #[instrument(skip(self, models), fields(count = models.len()))]
    async fn create_matches(&self, models: &[MatchModel]) -> Result<(), AppError> {
        let mut matches = self.matches.lock().unwrap();
        if let Some(existing) = models.iter().find(|m| matches.contains_key(&m.id)) {
            warn!(match_id = %existing.id, "Match already exists in memory");
            return Err(AppError::DatabaseError("Match already exists".to_string()));
        }
        for model in models {
            matches.insert(model.id.clone(), model.clone());
        }
        debug!("Matches stored in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: &str) -> Result<Option<MatchModel>, AppError> {
        let matches = self.matches.lock().unwrap();
        Ok(matches.get(match_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchModel>, AppError> {
        let matches = self.matches.lock().unwrap();
        let mut list: Vec<MatchModel> = matches
            .values()
            .filter(|model| filter.matches(model))
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then_with(|| a.field.cmp(&b.field))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(list)
    }

    #[instrument(skip(self, model), fields(match_id = %model.id))]
    async fn update_match(&self, model: &MatchModel) -> Result<(), AppError> {
        let mut matches = self.matches.lock().unwrap();
        match matches.get_mut(&model.id) {
            Some(existing) => {
                *existing = model.clone();
                Ok(())
            }
            None => {
                warn!("Match not found for update in memory");
                Err(AppError::NotFound("Match not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_match(&self, match_id: &str) -> Result<(), AppError> {
        let mut matches = self.matches.lock().unwrap();
        if matches.remove(match_id).is_none() {
            return Err(AppError::NotFound("Match not found".to_string()));
        }
        Ok(())
    }
}

/// PostgreSQL implementation storing matches as JSONB documents
pub struct PostgresMatchRepository {
    pool: PgPool,
}

impl PostgresMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchRepository for PostgresMatchRepository {
    #[instrument(skip(self, model), fields(match_id = %model.id))]
    async fn create_match(&self, model: &MatchModel) -> Result<(), AppError> {
        self.create_matches(std::slice::from_ref(model)).await
    }

    #[instrument(skip(self, models), fields(count = models.len()))]
    async fn create_matches(&self, models: &[MatchModel]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for model in models {
            sqlx::query(
                "INSERT INTO matches (id, tournament_id, start_time, doc) VALUES ($1, $2, $3, $4)",
            )
            .bind(&model.id)
            .bind(&model.tournament_id)
            .bind(model.start_time)
            .bind(Json(model))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                warn!(match_id = %model.id, error = %e, "Failed to insert match");
                AppError::DatabaseError(e.to_string())
            })?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: &str) -> Result<Option<MatchModel>, AppError> {
        let row = sqlx::query("SELECT doc FROM matches WHERE id = $1")
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let Json(model) = row.try_get::<Json<MatchModel>, _>("doc")?;
                Ok(Some(model))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchModel>, AppError> {
        let rows = sqlx::query(
            "SELECT doc FROM matches WHERE ($1::TEXT IS NULL OR tournament_id = $1) \
             ORDER BY start_time, doc->>'field', id",
        )
        .bind(filter.tournament_id.as_deref())
        .fetch_all(&self.pool)
        .await?;

        let mut list = Vec::with_capacity(rows.len());
        for row in rows {
            let Json(model) = row.try_get::<Json<MatchModel>, _>("doc")?;
            if filter.matches(&model) {
                list.push(model);
            }
        }
        Ok(list)
    }

    #[instrument(skip(self, model), fields(match_id = %model.id))]
    async fn update_match(&self, model: &MatchModel) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE matches SET start_time = $2, doc = $3 WHERE id = $1")
            .bind(&model.id)
            .bind(model.start_time)
            .bind(Json(model))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Match not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_match(&self, match_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Match not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::models::{MatchStatus, NewMatch, Round};
    use chrono::{Duration, TimeZone, Utc};

    fn model(tournament_id: &str, team1: &str, team2: &str, hour: u32) -> MatchModel {
        let start = Utc.with_ymd_and_hms(2025, 7, 5, hour, 0, 0).unwrap();
        MatchModel::new(NewMatch {
            tournament_id: tournament_id.to_string(),
            field: "North".to_string(),
            field_number: None,
            team1_id: team1.to_string(),
            team2_id: team2.to_string(),
            start_time: start,
            end_time: start + Duration::minutes(60),
            round: Round::Pool,
            bracket_position: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_start_time() {
        let repo = InMemoryMatchRepository::new();
        let late = model("t-1", "a", "b", 15);
        let early = model("t-1", "a", "c", 9);
        let elsewhere = model("t-2", "x", "y", 10);
        repo.create_matches(&[late.clone(), early.clone(), elsewhere])
            .await
            .unwrap();

        let listed = repo
            .list_matches(&MatchFilter::for_tournament("t-1"))
            .await
            .unwrap();

        let ids: Vec<&str> = listed.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec![early.id.as_str(), late.id.as_str()]);
    }

    #[tokio::test]
    async fn test_batch_with_duplicate_stores_nothing() {
        let repo = InMemoryMatchRepository::new();
        let first = model("t-1", "a", "b", 9);
        repo.create_match(&first).await.unwrap();

        let fresh = model("t-1", "c", "d", 10);
        let result = repo.create_matches(&[fresh.clone(), first]).await;

        assert!(matches!(result, Err(AppError::DatabaseError(_))));
        assert!(repo.get_match(&fresh.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let repo = InMemoryMatchRepository::new();
        let mut stored = model("t-1", "a", "b", 9);
        repo.create_match(&stored).await.unwrap();

        stored.status = MatchStatus::InProgress;
        repo.update_match(&stored).await.unwrap();

        let reloaded = repo.get_match(&stored.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, MatchStatus::InProgress);
    }
}
