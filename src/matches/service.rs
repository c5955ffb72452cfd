use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::{
    models::{
        MatchFilter, MatchModel, MatchStatus, NewMatch, Round, ScoringEvent, ScoringEventKind,
        SpiritSummary,
    },
    repository::MatchRepository,
    types::{MatchCreateRequest, MatchUpdateRequest, ScoreUpdateRequest, ScoringEventRequest},
};
use crate::{
    auth::{Caller, Role},
    event::{EventBus, TournamentEvent},
    locks::KeyedLocks,
    player::repository::PlayerRepository,
    shared::AppError,
    stats::{StatsChange, StatsService, StatsSync},
    team::repository::TeamRepository,
    tournament::repository::TournamentRepository,
};

/// Service for match records, scores and the scoring-event ledger.
///
/// Every mutation of a match runs under that match's lock, re-synchronises team
/// statistics and then saves the match.
pub struct MatchService {
    repository: Arc<dyn MatchRepository + Send + Sync>,
    team_repository: Arc<dyn TeamRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
    stats_service: Arc<StatsService>,
    event_bus: EventBus,
    match_locks: Arc<KeyedLocks>,
}

impl MatchService {
    pub fn new(
        repository: Arc<dyn MatchRepository + Send + Sync>,
        team_repository: Arc<dyn TeamRepository + Send + Sync>,
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
        tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
        stats_service: Arc<StatsService>,
        event_bus: EventBus,
        match_locks: Arc<KeyedLocks>,
    ) -> Self {
        Self {
            repository,
            team_repository,
            player_repository,
            tournament_repository,
            stats_service,
            event_bus,
            match_locks,
        }
    }

    #[instrument(skip(self, request), fields(tournament_id = %request.tournament_id))]
    pub async fn create_match(
        &self,
        request: MatchCreateRequest,
        caller: &Caller,
    ) -> Result<MatchModel, AppError> {
        caller.require_director()?;

        let mut tournament = self
            .tournament_repository
            .get_tournament(&request.tournament_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

        for team_id in [&request.team1_id, &request.team2_id] {
            let team = self
                .team_repository
                .get_team(team_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Team not found: {}", team_id)))?;
            if team.tournament_id != tournament.id {
                return Err(AppError::InvalidInput(format!(
                    "Team {} is not registered in this tournament",
                    team_id
                )));
            }
        }

        let model = MatchModel::new(NewMatch {
            tournament_id: request.tournament_id,
            field: request.field,
            field_number: request.field_number,
            team1_id: request.team1_id,
            team2_id: request.team2_id,
            start_time: request.start_time,
            end_time: request.end_time,
            round: request.round.unwrap_or(Round::Pool),
            bracket_position: None,
        })
        .map_err(AppError::InvalidInput)?;

        self.repository.create_match(&model).await?;
        tournament.match_ids.push(model.id.clone());
        self.tournament_repository
            .update_tournament(&tournament)
            .await?;

        info!(match_id = %model.id, "Match created");
        self.event_bus
            .emit(
                &model.tournament_id,
                TournamentEvent::MatchesScheduled {
                    match_ids: vec![model.id.clone()],
                },
            )
            .await;
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_match(&self, match_id: &str) -> Result<MatchModel, AppError> {
        self.repository
            .get_match(match_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchModel>, AppError> {
        self.repository.list_matches(filter).await
    }

    /// Applies the whitelisted scheduling fields of `request`
    #[instrument(skip(self, request))]
    pub async fn update_match(
        &self,
        match_id: &str,
        request: MatchUpdateRequest,
        caller: &Caller,
    ) -> Result<MatchModel, AppError> {
        if !caller.is_director() && caller.role != Role::FieldOfficial {
            return Err(AppError::Unauthorized(format!(
                "role {} cannot edit matches",
                caller.role
            )));
        }

        let _guard = self.match_locks.lock(match_id).await;

        let mut model = self.get_match(match_id).await?;
        if let Some(field) = request.field {
            model.field = field;
        }
        if let Some(field_number) = request.field_number {
            model.field_number = Some(field_number);
        }
        if let Some(start_time) = request.start_time {
            model.start_time = start_time;
        }
        if let Some(end_time) = request.end_time {
            model.end_time = end_time;
        }
        if model.end_time <= model.start_time {
            return Err(AppError::InvalidInput(
                "Match end time must be after its start time".to_string(),
            ));
        }
        if let Some(notes) = request.notes {
            model.notes = Some(notes);
        }

        self.commit(&mut model, caller).await?;
        Ok(model)
    }

    /// Overwrites scores and/or status.
    ///
    /// Score changes are written to the ledger as correction events carrying the delta, so
    /// the scores keep matching the per-team sum of logged points.
    #[instrument(skip(self, request))]
    pub async fn update_score(
        &self,
        match_id: &str,
        request: ScoreUpdateRequest,
        caller: &Caller,
    ) -> Result<MatchModel, AppError> {
        let _guard = self.match_locks.lock(match_id).await;

        let mut model = self.get_match(match_id).await?;
        let previous_status = model.status;
        let previous_scores = (model.score1, model.score2);
        let now = Utc::now();

        let targets = [
            (model.team1_id.clone(), model.score1, request.score1),
            (model.team2_id.clone(), model.score2, request.score2),
        ];
        for (team_id, current, target) in targets {
            let Some(target) = target else { continue };
            let delta = i64::from(target) - i64::from(current);
            if delta == 0 {
                continue;
            }
            let points = i32::try_from(delta)
                .map_err(|_| AppError::InvalidInput("Score change is too large".to_string()))?;
            model
                .record_event(ScoringEvent {
                    team_id,
                    player_id: None,
                    timestamp: now,
                    points,
                    kind: ScoringEventKind::Correction,
                })
                .map_err(AppError::InvalidInput)?;
        }

        if let Some(status) = request.status {
            model.status = status;
        }

        let sync = self.commit(&mut model, caller).await?;

        if (model.score1, model.score2) != previous_scores {
            self.publish_score(&model).await;
        }
        if model.status == MatchStatus::Completed && previous_status != MatchStatus::Completed {
            info!(match_id = %model.id, score1 = model.score1, score2 = model.score2, "Match completed");
            self.event_bus
                .emit(
                    &model.tournament_id,
                    TournamentEvent::MatchCompleted {
                        match_id: model.id.clone(),
                        score1: model.score1,
                        score2: model.score2,
                    },
                )
                .await;
        }
        self.publish_stats(&model.tournament_id, sync).await;

        Ok(model)
    }

    /// Appends one scoring event and moves the scoring team's score by its points
    #[instrument(skip(self, request), fields(team_id = %request.team_id))]
    pub async fn add_scoring_event(
        &self,
        match_id: &str,
        request: ScoringEventRequest,
        caller: &Caller,
    ) -> Result<MatchModel, AppError> {
        if request.points < 1 {
            return Err(AppError::InvalidInput(
                "Scoring events must award at least one point".to_string(),
            ));
        }

        let _guard = self.match_locks.lock(match_id).await;

        let mut model = self.get_match(match_id).await?;
        if model.status == MatchStatus::Cancelled {
            return Err(AppError::Conflict(
                "Cannot score in a cancelled match".to_string(),
            ));
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

        model
            .record_event(ScoringEvent {
                team_id: request.team_id,
                player_id: Some(request.player_id),
                timestamp: request.timestamp.unwrap_or_else(Utc::now),
                points: request.points,
                kind: ScoringEventKind::Play,
            })
            .map_err(AppError::InvalidInput)?;

        let sync = self.commit(&mut model, caller).await?;

        debug!(
            match_id = %model.id,
            events = model.scoring_history.len(),
            "Scoring event recorded"
        );
        self.publish_score(&model).await;
        self.publish_stats(&model.tournament_id, sync).await;

        Ok(model)
    }

    /// Replaces the match's spirit summary and folds it into statistics when due
    #[instrument(skip(self, summary, caller))]
    pub async fn attach_spirit(
        &self,
        match_id: &str,
        summary: SpiritSummary,
        caller: &Caller,
    ) -> Result<MatchModel, AppError> {
        let _guard = self.match_locks.lock(match_id).await;

        let mut model = self.get_match(match_id).await?;
        model.spirit = Some(summary);

        let sync = self.commit(&mut model, caller).await?;
        self.publish_stats(&model.tournament_id, sync).await;
        Ok(model)
    }

    /// Syncs statistics for `model` and saves it
    async fn commit(&self, model: &mut MatchModel, caller: &Caller) -> Result<StatsSync, AppError> {
        let sync = self.stats_service.sync_match(model).await?;

        model.updated_by = Some(caller.user_id.clone());
        model.updated_at = Utc::now();

        if let Err(e) = self.repository.update_match(model).await {
            if sync.change != StatsChange::Unchanged {
                error!(
                    match_id = %model.id,
                    team1_id = %model.team1_id,
                    team2_id = %model.team2_id,
                    error = %e,
                    "Team statistics were written but the match could not be saved"
                );
            }
            return Err(e);
        }
        Ok(sync)
    }

    async fn publish_score(&self, model: &MatchModel) {
        self.event_bus
            .emit(
                &model.tournament_id,
                TournamentEvent::ScoreUpdated {
                    match_id: model.id.clone(),
                    score1: model.score1,
                    score2: model.score2,
                },
            )
            .await;
    }

    async fn publish_stats(&self, tournament_id: &str, sync: StatsSync) {
        for team in sync.teams {
            self.event_bus
                .emit(
                    tournament_id,
                    TournamentEvent::StatsUpdated {
                        team_id: team.id,
                        statistics: team.statistics,
                    },
                )
                .await;
        }
    }
}
