use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{RosterEntry, TeamModel, TeamStatus},
    repository::TeamRepository,
    types::{AddPlayerRequest, JerseyVerification, TeamRegisterRequest},
};
use crate::{
    auth::{Caller, Role},
    locks::KeyedLocks,
    player::repository::PlayerRepository,
    shared::AppError,
    tournament::repository::TournamentRepository,
};

/// Service for team registration and roster management.
///
/// Edits run under the team's lock in `team_locks`, shared with the stats aggregator.
pub struct TeamService {
    repository: Arc<dyn TeamRepository + Send + Sync>,
    tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    team_locks: Arc<KeyedLocks>,
}

impl TeamService {
    pub fn new(
        repository: Arc<dyn TeamRepository + Send + Sync>,
        tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
        team_locks: Arc<KeyedLocks>,
    ) -> Self {
        Self {
            repository,
            tournament_repository,
            player_repository,
            team_locks,
        }
    }

    #[instrument(skip(self, request), fields(tournament_id = %request.tournament_id))]
    pub async fn register_team(
        &self,
        request: TeamRegisterRequest,
        caller: &Caller,
    ) -> Result<TeamModel, AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::InvalidInput("Team name is required".to_string()));
        }

        let mut tournament = self
            .tournament_repository
            .get_tournament(&request.tournament_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

        let existing = self
            .repository
            .list_teams(Some(&request.tournament_id))
            .await?;

        if let Some(max_teams) = tournament.max_teams {
            let approved = existing.iter().filter(|team| team.is_approved()).count();
            if approved >= max_teams as usize {
                return Err(AppError::Conflict("Tournament is full".to_string()));
            }
        }
        if existing.iter().any(|team| team.name == request.name) {
            return Err(AppError::Conflict(
                "Team name already taken in this tournament".to_string(),
            ));
        }

        let mut team = TeamModel::new(
            request.tournament_id,
            request.name,
            request.captain_id,
            caller.user_id.clone(),
        );
        team.co_captain_id = request.co_captain_id;
        team.jersey_colors = request.jersey_colors;

        self.repository.create_team(&team).await?;

        tournament.team_ids.push(team.id.clone());
        self.tournament_repository
            .update_tournament(&tournament)
            .await?;

        info!(team_id = %team.id, name = %team.name, "Team registered");
        Ok(team)
    }

    #[instrument(skip(self))]
    pub async fn get_team(&self, team_id: &str) -> Result<TeamModel, AppError> {
        self.repository
            .get_team(team_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Team not found".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_teams(&self, tournament_id: Option<&str>) -> Result<Vec<TeamModel>, AppError> {
        self.repository.list_teams(tournament_id).await
    }

    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        team_id: &str,
        status: TeamStatus,
        caller: &Caller,
    ) -> Result<TeamModel, AppError> {
        caller.require_director()?;
        let _guard = self.team_locks.lock(team_id).await;
        let mut team = self.get_team(team_id).await?;

        team.status = status;
        self.repository.update_team(&team).await?;

        info!(team_id = %team.id, status = %status, "Team status changed");
        Ok(team)
    }

    #[instrument(skip(self, request), fields(player_id = %request.player_id))]
    pub async fn add_player(
        &self,
        team_id: &str,
        request: AddPlayerRequest,
        caller: &Caller,
    ) -> Result<TeamModel, AppError> {
        let _guard = self.team_locks.lock(team_id).await;
        let mut team = self.get_team(team_id).await?;
        require_manager(&team, caller)?;

        if team.roster_locked {
            return Err(AppError::Conflict("Roster is locked".to_string()));
        }
        if team.has_player(&request.player_id) {
            return Err(AppError::Conflict("Player already in roster".to_string()));
        }
        if self
            .player_repository
            .get_player(&request.player_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "Player not found: {}",
                request.player_id
            )));
        }
        if let Some(jersey_number) = request.jersey_number {
            if team.jersey_taken(jersey_number) {
                return Err(AppError::Conflict(format!(
                    "Jersey number {} already taken",
                    jersey_number
                )));
            }
        }

        team.roster.push(RosterEntry {
            player_id: request.player_id,
            jersey_number: request.jersey_number,
            jersey_verified: false,
            role: request.role,
            joined_at: Utc::now(),
        });
        self.repository.update_team(&team).await?;

        debug!(team_id = %team.id, roster_size = team.roster.len(), "Player added to roster");
        Ok(team)
    }

    #[instrument(skip(self))]
    pub async fn lock_roster(
        &self,
        team_id: &str,
        locked: bool,
        caller: &Caller,
    ) -> Result<TeamModel, AppError> {
        caller.require_director()?;
        let _guard = self.team_locks.lock(team_id).await;
        let mut team = self.get_team(team_id).await?;

        team.roster_locked = locked;
        self.repository.update_team(&team).await?;
        Ok(team)
    }

    /// Sets jersey numbers and verification flags; unknown players are skipped
    #[instrument(skip(self, players), fields(entries = players.len()))]
    pub async fn verify_jerseys(
        &self,
        team_id: &str,
        players: Vec<JerseyVerification>,
        caller: &Caller,
    ) -> Result<TeamModel, AppError> {
        let _guard = self.team_locks.lock(team_id).await;
        let mut team = self.get_team(team_id).await?;
        if caller.role != Role::FieldOfficial {
            require_manager(&team, caller)?;
        }

        for verification in players {
            let Some(index) = team
                .roster
                .iter()
                .position(|entry| entry.player_id == verification.player_id)
            else {
                warn!(player_id = %verification.player_id, "Jersey verification for player not on roster");
                continue;
            };

            if let Some(jersey_number) = verification.jersey_number {
                let clash = team.roster.iter().enumerate().any(|(other, entry)| {
                    other != index && entry.jersey_number == Some(jersey_number)
                });
                if clash {
                    return Err(AppError::Conflict(format!(
                        "Jersey number {} already taken",
                        jersey_number
                    )));
                }
                team.roster[index].jersey_number = Some(jersey_number);
            }
            team.roster[index].jersey_verified = verification.verified;
        }

        self.repository.update_team(&team).await?;
        Ok(team)
    }
}

/// Directors, the registering user and the captain may act for a team
pub(crate) fn require_manager(team: &TeamModel, caller: &Caller) -> Result<(), AppError> {
    if caller.is_director() || caller.user_id == team.registered_by || caller.user_id == team.captain_id
    {
        Ok(())
    } else {
        Err(AppError::Unauthorized(
            "Only the team's managers may act for it".to_string(),
        ))
    }
}
