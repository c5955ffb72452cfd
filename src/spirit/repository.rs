use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{instrument, warn};

use super::models::SpiritScoreModel;
use crate::shared::AppError;

const DUPLICATE_SUBMISSION: &str = "Spirit score already submitted for this match";

/// Trait for spirit score repository operations
#[async_trait]
pub trait SpiritScoreRepository {
    /// Fails with `Conflict` when the (match, by, for) triple already has a score
    async fn create_score(&self, score: &SpiritScoreModel) -> Result<(), AppError>;
    async fn list_for_team(&self, team_id: &str) -> Result<Vec<SpiritScoreModel>, AppError>;
    async fn list_for_match(&self, match_id: &str) -> Result<Vec<SpiritScoreModel>, AppError>;
    async fn delete_score(&self, score_id: &str) -> Result<(), AppError>;
}

/// In-memory implementation of SpiritScoreRepository for development and testing
pub struct InMemorySpiritScoreRepository {
    scores: Mutex<HashMap<String, SpiritScoreModel>>,
}

impl Default for InMemorySpiritScoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySpiritScoreRepository {
    pub fn new() -> Self {
        Self {
            scores: Mutex::new(HashMap::new()),
        }
    }

    fn sorted(mut list: Vec<SpiritScoreModel>) -> Vec<SpiritScoreModel> {
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        list
    }
}

#[async_trait]
impl SpiritScoreRepository for InMemorySpiritScoreRepository {
    #[instrument(skip(self, score), fields(match_id = %score.match_id))]
    async fn create_score(&self, score: &SpiritScoreModel) -> Result<(), AppError> {
        let mut scores = self.scores.lock().unwrap();
        let duplicate = scores.values().any(|existing| {
            existing.match_id == score.match_id
                && existing.submitted_by == score.submitted_by
                && existing.submitted_for == score.submitted_for
        });
        if duplicate {
            warn!(submitted_by = %score.submitted_by, "Duplicate spirit score submission");
            return Err(AppError::Conflict(DUPLICATE_SUBMISSION.to_string()));
        }
        scores.insert(score.id.clone(), score.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_team(&self, team_id: &str) -> Result<Vec<SpiritScoreModel>, AppError> {
        let scores = self.scores.lock().unwrap();
        Ok(Self::sorted(
            scores
                .values()
                .filter(|score| score.submitted_for == team_id)
                .cloned()
                .collect(),
        ))
    }

    #[instrument(skip(self))]
    async fn list_for_match(&self, match_id: &str) -> Result<Vec<SpiritScoreModel>, AppError> {
        let scores = self.scores.lock().unwrap();
        Ok(Self::sorted(
            scores
                .values()
                .filter(|score| score.match_id == match_id)
                .cloned()
                .collect(),
        ))
    }

    #[instrument(skip(self))]
    async fn delete_score(&self, score_id: &str) -> Result<(), AppError> {
        let mut scores = self.scores.lock().unwrap();
        if scores.remove(score_id).is_none() {
            return Err(AppError::NotFound("Spirit score not found".to_string()));
        }
        Ok(())
    }
}

/// PostgreSQL implementation storing spirit scores as JSONB documents
pub struct PostgresSpiritScoreRepository {
    pool: PgPool,
}

impl PostgresSpiritScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Vec<SpiritScoreModel>, AppError> {
        let query = format!(
            "SELECT doc FROM spirit_scores WHERE {} = $1 ORDER BY doc->>'created_at', id",
            column
        );
        let rows = sqlx::query(&query).bind(value).fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| {
                row.try_get::<Json<SpiritScoreModel>, _>("doc")
                    .map(|Json(score)| score)
                    .map_err(AppError::from)
            })
            .collect()
    }
}

#[async_trait]
impl SpiritScoreRepository for PostgresSpiritScoreRepository {
    #[instrument(skip(self, score), fields(match_id = %score.match_id))]
    async fn create_score(&self, score: &SpiritScoreModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO spirit_scores (id, match_id, submitted_by, submitted_for, doc) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&score.id)
        .bind(&score.match_id)
        .bind(&score.submitted_by)
        .bind(&score.submitted_for)
        .bind(Json(score))
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(DUPLICATE_SUBMISSION.to_string())
            }
            _ => {
                warn!(error = %e, "Failed to store spirit score");
                AppError::DatabaseError(e.to_string())
            }
        })?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_team(&self, team_id: &str) -> Result<Vec<SpiritScoreModel>, AppError> {
        self.list_where("submitted_for", team_id).await
    }

    #[instrument(skip(self))]
    async fn list_for_match(&self, match_id: &str) -> Result<Vec<SpiritScoreModel>, AppError> {
        self.list_where("match_id", match_id).await
    }

    #[instrument(skip(self))]
    async fn delete_score(&self, score_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM spirit_scores WHERE id = $1")
            .bind(score_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Spirit score not found".to_string()));
        }
        Ok(())
    }
}
