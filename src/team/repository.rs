use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, error, instrument, warn};

use super::models::TeamModel;
use crate::shared::AppError;

/// Trait for team repository operations
#[async_trait]
pub trait TeamRepository {
    async fn create_team(&self, team: &TeamModel) -> Result<(), AppError>;
    async fn get_team(&self, team_id: &str) -> Result<Option<TeamModel>, AppError>;
    /// Teams in creation order, optionally limited to one tournament
    async fn list_teams(&self, tournament_id: Option<&str>) -> Result<Vec<TeamModel>, AppError>;
    /// Saves the team document except `statistics`, which keeps its stored value
    async fn update_team(&self, team: &TeamModel) -> Result<(), AppError>;
    /// Saves the `statistics` of both teams or of neither
    async fn update_statistics_pair(
        &self,
        first: &TeamModel,
        second: &TeamModel,
    ) -> Result<(), AppError>;
    async fn delete_team(&self, team_id: &str) -> Result<(), AppError>;
}

/// In-memory implementation of TeamRepository for development and testing
pub struct InMemoryTeamRepository {
    teams: Mutex<HashMap<String, TeamModel>>,
}

impl Default for InMemoryTeamRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self {
            teams: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    #[instrument(skip(self, team))]
    async fn create_team(&self, team: &TeamModel) -> Result<(), AppError> {
        debug!(team_id = %team.id, tournament_id = %team.tournament_id, "Creating team in memory");

        let mut teams = self.teams.lock().unwrap();
        if teams.contains_key(&team.id) {
            warn!(team_id = %team.id, "Team already exists in memory");
            return Err(AppError::DatabaseError("Team already exists".to_string()));
        }
        teams.insert(team.id.clone(), team.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_team(&self, team_id: &str) -> Result<Option<TeamModel>, AppError> {
        let teams = self.teams.lock().unwrap();
        Ok(teams.get(team_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_teams(&self, tournament_id: Option<&str>) -> Result<Vec<TeamModel>, AppError> {
        let teams = self.teams.lock().unwrap();
        let mut list: Vec<TeamModel> = teams
            .values()
            .filter(|team| tournament_id.map_or(true, |id| team.tournament_id == id))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    #[instrument(skip(self, team))]
    async fn update_team(&self, team: &TeamModel) -> Result<(), AppError> {
        let mut teams = self.teams.lock().unwrap();
        match teams.get_mut(&team.id) {
            Some(existing) => {
                let statistics = existing.statistics;
                *existing = TeamModel {
                    statistics,
                    ..team.clone()
                };
                Ok(())
            }
            None => {
                warn!(team_id = %team.id, "Team not found for update in memory");
                Err(AppError::NotFound("Team not found".to_string()))
            }
        }
    }

    #[instrument(skip(self, first, second), fields(first_id = %first.id, second_id = %second.id))]
    async fn update_statistics_pair(
        &self,
        first: &TeamModel,
        second: &TeamModel,
    ) -> Result<(), AppError> {
        let mut teams = self.teams.lock().unwrap();
        if !teams.contains_key(&first.id) || !teams.contains_key(&second.id) {
            warn!("Statistics update references a missing team");
            return Err(AppError::NotFound("Team not found".to_string()));
        }
        for team in [first, second] {
            if let Some(existing) = teams.get_mut(&team.id) {
                existing.statistics = team.statistics;
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_team(&self, team_id: &str) -> Result<(), AppError> {
        let mut teams = self.teams.lock().unwrap();
        if teams.remove(team_id).is_none() {
            return Err(AppError::NotFound("Team not found".to_string()));
        }
        Ok(())
    }
}

/// PostgreSQL implementation storing teams as JSONB documents
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    #[instrument(skip(self, team))]
    async fn create_team(&self, team: &TeamModel) -> Result<(), AppError> {
        sqlx::query("INSERT INTO teams (id, tournament_id, doc) VALUES ($1, $2, $3)")
            .bind(&team.id)
            .bind(&team.tournament_id)
            .bind(Json(team))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create team in database");
                AppError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_team(&self, team_id: &str) -> Result<Option<TeamModel>, AppError> {
        let row = sqlx::query("SELECT doc FROM teams WHERE id = $1")
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let Json(team) = row.try_get::<Json<TeamModel>, _>("doc")?;
                Ok(Some(team))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list_teams(&self, tournament_id: Option<&str>) -> Result<Vec<TeamModel>, AppError> {
        let rows = sqlx::query(
            "SELECT doc FROM teams WHERE ($1::TEXT IS NULL OR tournament_id = $1) \
             ORDER BY doc->>'created_at', id",
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                row.try_get::<Json<TeamModel>, _>("doc")
                    .map(|Json(team)| team)
                    .map_err(AppError::from)
            })
            .collect()
    }

    #[instrument(skip(self, team))]
    async fn update_team(&self, team: &TeamModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE teams SET doc = jsonb_set($2::jsonb, '{statistics}', doc->'statistics') \
             WHERE id = $1",
        )
        .bind(&team.id)
        .bind(Json(team))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Team not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, first, second), fields(first_id = %first.id, second_id = %second.id))]
    async fn update_statistics_pair(
        &self,
        first: &TeamModel,
        second: &TeamModel,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for team in [first, second] {
            let result =
                sqlx::query("UPDATE teams SET doc = jsonb_set(doc, '{statistics}', $2) WHERE id = $1")
                    .bind(&team.id)
                    .bind(Json(&team.statistics))
                    .execute(&mut *tx)
                    .await?;

            if result.rows_affected() == 0 {
                error!(team_id = %team.id, "Team vanished during statistics update, rolling back");
                tx.rollback().await?;
                return Err(AppError::NotFound("Team not found".to_string()));
            }
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_team(&self, team_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Team not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, tournament_id: &str) -> TeamModel {
        TeamModel::new(
            tournament_id.to_string(),
            name.to_string(),
            "captain".to_string(),
            "manager".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_get_team() {
        let repo = InMemoryTeamRepository::new();
        let team = team("Hucks", "t-1");

        repo.create_team(&team).await.unwrap();

        let retrieved = repo.get_team(&team.id).await.unwrap().unwrap();
        assert_eq!(retrieved.name, "Hucks");
        assert!(repo.get_team("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_teams_filters_by_tournament() {
        let repo = InMemoryTeamRepository::new();
        repo.create_team(&team("A", "t-1")).await.unwrap();
        repo.create_team(&team("B", "t-2")).await.unwrap();
        repo.create_team(&team("C", "t-1")).await.unwrap();

        assert_eq!(repo.list_teams(Some("t-1")).await.unwrap().len(), 2);
        assert_eq!(repo.list_teams(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_pair_update_with_missing_team_writes_nothing() {
        let repo = InMemoryTeamRepository::new();
        let mut stored = team("A", "t-1");
        repo.create_team(&stored).await.unwrap();
        let ghost = team("Ghost", "t-1");

        stored.statistics.wins = 1;
        let result = repo.update_statistics_pair(&stored, &ghost).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        let reloaded = repo.get_team(&stored.id).await.unwrap().unwrap();
        assert_eq!(reloaded.statistics.wins, 0);
    }

    #[tokio::test]
    async fn test_pair_update_writes_both() {
        let repo = InMemoryTeamRepository::new();
        let mut first = team("A", "t-1");
        let mut second = team("B", "t-1");
        repo.create_team(&first).await.unwrap();
        repo.create_team(&second).await.unwrap();

        first.statistics.wins = 1;
        second.statistics.losses = 1;
        first.name = "Renamed".to_string();
        repo.update_statistics_pair(&first, &second).await.unwrap();

        let stored = repo.get_team(&first.id).await.unwrap().unwrap();
        assert_eq!(stored.statistics.wins, 1);
        assert_eq!(stored.name, "A");
        assert_eq!(repo.get_team(&second.id).await.unwrap().unwrap().statistics.losses, 1);
    }

    #[tokio::test]
    async fn test_team_update_keeps_stored_statistics() {
        let repo = InMemoryTeamRepository::new();
        let first = team("A", "t-1");
        let second = team("B", "t-1");
        repo.create_team(&first).await.unwrap();
        repo.create_team(&second).await.unwrap();

        // A roster edit read before the result was recorded
        let mut stale = repo.get_team(&first.id).await.unwrap().unwrap();

        let mut winner = first.clone();
        winner.statistics.record(3, 1, None).unwrap();
        repo.update_statistics_pair(&winner, &second).await.unwrap();

        stale.roster_locked = true;
        repo.update_team(&stale).await.unwrap();

        let stored = repo.get_team(&first.id).await.unwrap().unwrap();
        assert!(stored.roster_locked);
        assert_eq!(stored.statistics.wins, 1);
        assert_eq!(stored.statistics.matches_played, 1);
    }
}
