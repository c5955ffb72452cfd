use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::{Announcement, FieldModel, TournamentModel},
    repository::TournamentRepository,
    types::{
        AnnouncementCreateRequest, FieldCreateRequest, StandingsOrder, TournamentCreateRequest,
        TournamentUpdateRequest,
    },
};
use crate::{
    auth::Caller,
    locks::KeyedLocks,
    matches::{models::MatchFilter, repository::MatchRepository},
    shared::AppError,
    stats::standings::{rank_teams, StandingRow},
    team::{models::TeamStatus, repository::TeamRepository},
};

/// Service for tournament business logic
pub struct TournamentService {
    repository: Arc<dyn TournamentRepository + Send + Sync>,
    team_repository: Arc<dyn TeamRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    team_locks: Arc<KeyedLocks>,
    match_locks: Arc<KeyedLocks>,
}

impl TournamentService {
    pub fn new(
        repository: Arc<dyn TournamentRepository + Send + Sync>,
        team_repository: Arc<dyn TeamRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        team_locks: Arc<KeyedLocks>,
        match_locks: Arc<KeyedLocks>,
    ) -> Self {
        Self {
            repository,
            team_repository,
            match_repository,
            team_locks,
            match_locks,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_tournament(
        &self,
        request: TournamentCreateRequest,
        caller: &Caller,
    ) -> Result<TournamentModel, AppError> {
        caller.require_director()?;

        if request.name.trim().is_empty() {
            return Err(AppError::InvalidInput("Tournament name is required".to_string()));
        }
        if request.end_date < request.start_date {
            return Err(AppError::InvalidInput(
                "Tournament end date is before its start date".to_string(),
            ));
        }

        let mut tournament = TournamentModel::new(
            request.name,
            request.description,
            request.location,
            request.start_date,
            request.end_date,
            caller.user_id.clone(),
        );
        tournament.max_teams = request.max_teams;
        if let Some(enabled) = request.spirit_score_enabled {
            tournament.spirit_score_enabled = enabled;
        }

        self.repository.create_tournament(&tournament).await?;

        info!(tournament_id = %tournament.id, name = %tournament.name, "Tournament created");
        Ok(tournament)
    }

    #[instrument(skip(self))]
    pub async fn get_tournament(&self, tournament_id: &str) -> Result<TournamentModel, AppError> {
        self.repository
            .get_tournament(tournament_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_tournaments(&self) -> Result<Vec<TournamentModel>, AppError> {
        self.repository.list_tournaments().await
    }

    /// Applies the whitelisted fields of `request`; structural fields stay untouched
    #[instrument(skip(self, request))]
    pub async fn update_tournament(
        &self,
        tournament_id: &str,
        request: TournamentUpdateRequest,
        caller: &Caller,
    ) -> Result<TournamentModel, AppError> {
        let mut tournament = self.get_tournament(tournament_id).await?;
        caller.require_owner(&tournament.organizer_id)?;

        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(AppError::InvalidInput("Tournament name is required".to_string()));
            }
            tournament.name = name;
        }
        if let Some(description) = request.description {
            tournament.description = description;
        }
        if let Some(location) = request.location {
            tournament.location = location;
        }
        if let Some(start_date) = request.start_date {
            tournament.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            tournament.end_date = end_date;
        }
        if tournament.end_date < tournament.start_date {
            return Err(AppError::InvalidInput(
                "Tournament end date is before its start date".to_string(),
            ));
        }
        if let Some(status) = request.status {
            tournament.status = status;
        }
        if let Some(max_teams) = request.max_teams {
            tournament.max_teams = Some(max_teams);
        }
        if let Some(enabled) = request.spirit_score_enabled {
            tournament.spirit_score_enabled = enabled;
        }

        self.repository.update_tournament(&tournament).await?;
        debug!(tournament_id = %tournament.id, "Tournament updated");
        Ok(tournament)
    }

    /// Removes the tournament together with its matches and teams
    #[instrument(skip(self))]
    pub async fn delete_tournament(
        &self,
        tournament_id: &str,
        caller: &Caller,
    ) -> Result<(), AppError> {
        let tournament = self.get_tournament(tournament_id).await?;
        caller.require_owner(&tournament.organizer_id)?;

        let matches = self
            .match_repository
            .list_matches(&MatchFilter::for_tournament(tournament_id))
            .await?;
        for model in &matches {
            let guard = self.match_locks.lock(&model.id).await;
            self.match_repository.delete_match(&model.id).await?;
            drop(guard);
            self.match_locks.remove(&model.id).await;
        }
        let teams = self.team_repository.list_teams(Some(tournament_id)).await?;
        for team in &teams {
            let guard = self.team_locks.lock(&team.id).await;
            self.team_repository.delete_team(&team.id).await?;
            drop(guard);
            self.team_locks.remove(&team.id).await;
        }

        self.repository.delete_tournament(tournament_id).await?;
        info!(
            tournament_id = %tournament_id,
            match_count = matches.len(),
            team_count = teams.len(),
            "Tournament removed"
        );
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn add_field(
        &self,
        tournament_id: &str,
        request: FieldCreateRequest,
        caller: &Caller,
    ) -> Result<TournamentModel, AppError> {
        caller.require_director()?;
        let mut tournament = self.get_tournament(tournament_id).await?;

        if request.name.trim().is_empty() {
            return Err(AppError::InvalidInput("Field name is required".to_string()));
        }
        if tournament.has_field(&request.name) {
            return Err(AppError::Conflict(format!(
                "Field {} already exists",
                request.name
            )));
        }

        tournament.fields.push(FieldModel {
            name: request.name,
            field_number: request.field_number,
            location: request.location,
            capacity: request.capacity,
        });
        self.repository.update_tournament(&tournament).await?;

        debug!(tournament_id = %tournament.id, field_count = tournament.fields.len(), "Field added");
        Ok(tournament)
    }

    #[instrument(skip(self, request))]
    pub async fn add_announcement(
        &self,
        tournament_id: &str,
        request: AnnouncementCreateRequest,
        caller: &Caller,
    ) -> Result<TournamentModel, AppError> {
        caller.require_director()?;
        let mut tournament = self.get_tournament(tournament_id).await?;

        tournament.announcements.push(Announcement {
            title: request.title,
            content: request.content,
            posted_by: caller.user_id.clone(),
            created_at: Utc::now(),
        });
        self.repository.update_tournament(&tournament).await?;
        Ok(tournament)
    }

    /// Standings of every non-rejected team of the tournament
    #[instrument(skip(self))]
    pub async fn standings(
        &self,
        tournament_id: &str,
        order: StandingsOrder,
    ) -> Result<Vec<StandingRow>, AppError> {
        let tournament = self.get_tournament(tournament_id).await?;

        let mut teams: Vec<_> = self
            .team_repository
            .list_teams(Some(tournament_id))
            .await?
            .into_iter()
            .filter(|team| team.status != TeamStatus::Rejected)
            .collect();
        teams.sort_by_key(|team| {
            tournament
                .registration_index(&team.id)
                .unwrap_or(usize::MAX)
        });

        Ok(rank_teams(&teams, order))
    }
}
