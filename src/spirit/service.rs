use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{error, info, instrument};

use super::{
    models::{SpiritScoreModel, MAX_COMMENT_CHARS},
    repository::SpiritScoreRepository,
    types::{SpiritScoreRequest, TeamSpiritScores},
};
use crate::{
    auth::{Caller, Role},
    matches::{
        models::{MatchModel, SpiritSummary},
        service::MatchService,
    },
    shared::AppError,
    team::{repository::TeamRepository, service::require_manager},
    tournament::repository::TournamentRepository,
};

/// Service for spirit-of-the-game ratings
pub struct SpiritService {
    repository: Arc<dyn SpiritScoreRepository + Send + Sync>,
    tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
    team_repository: Arc<dyn TeamRepository + Send + Sync>,
    match_service: Arc<MatchService>,
    // Serialises submissions so each summary rebuild sees every stored score
    submit_lock: AsyncMutex<()>,
}

impl SpiritService {
    pub fn new(
        repository: Arc<dyn SpiritScoreRepository + Send + Sync>,
        tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
        team_repository: Arc<dyn TeamRepository + Send + Sync>,
        match_service: Arc<MatchService>,
    ) -> Self {
        Self {
            repository,
            tournament_repository,
            team_repository,
            match_service,
            submit_lock: AsyncMutex::new(()),
        }
    }

    /// Stores a rating from `submitted_by` for its opponent.
    ///
    /// Directors may submit for any team. Otherwise the caller must be a team manager who
    /// registered or captains the rating team.
    #[instrument(skip(self, request), fields(match_id = %request.match_id))]
    pub async fn submit(
        &self,
        request: SpiritScoreRequest,
        caller: &Caller,
    ) -> Result<SpiritScoreModel, AppError> {
        let categories = request.categories();
        categories.validate().map_err(AppError::InvalidInput)?;
        if let Some(comments) = &request.comments {
            if comments.chars().count() > MAX_COMMENT_CHARS {
                return Err(AppError::InvalidInput(format!(
                    "Comments are limited to {} characters",
                    MAX_COMMENT_CHARS
                )));
            }
        }

        let _guard = self.submit_lock.lock().await;

        let model = self.match_service.get_match(&request.match_id).await?;
        if request.submitted_by == request.submitted_for {
            return Err(AppError::InvalidInput(
                "A team cannot rate itself".to_string(),
            ));
        }
        if !model.involves(&request.submitted_by) || !model.involves(&request.submitted_for) {
            return Err(AppError::InvalidInput(
                "Both teams must be playing in the match".to_string(),
            ));
        }
        if !caller.is_director() {
            if caller.role != Role::TeamManager {
                return Err(AppError::Unauthorized(format!(
                    "role {} cannot submit spirit scores",
                    caller.role
                )));
            }
            let rating_team = self
                .team_repository
                .get_team(&request.submitted_by)
                .await?
                .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;
            require_manager(&rating_team, caller)?;
        }

        let tournament = self
            .tournament_repository
            .get_tournament(&model.tournament_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;
        if !tournament.spirit_score_enabled {
            return Err(AppError::InvalidInput(
                "Spirit scoring is disabled for this tournament".to_string(),
            ));
        }

        let score = SpiritScoreModel::new(
            request.match_id,
            request.submitted_by,
            request.submitted_for,
            categories,
            request.comments,
            caller.user_id.clone(),
        );
        self.repository.create_score(&score).await?;

        if let Err(e) = self.attach_summary(&model, caller).await {
            error!(
                match_id = %model.id,
                score_id = %score.id,
                error = %e,
                "Spirit summary could not be attached to the match, withdrawing the score"
            );
            if let Err(rollback) = self.repository.delete_score(&score.id).await {
                error!(
                    match_id = %model.id,
                    score_id = %score.id,
                    error = %rollback,
                    "Failed to withdraw spirit score"
                );
            }
            return Err(e);
        }

        info!(
            submitted_by = %score.submitted_by,
            submitted_for = %score.submitted_for,
            total = score.total_score,
            "Spirit score submitted"
        );
        Ok(score)
    }

    /// Scores received by `team_id` with their average total
    #[instrument(skip(self))]
    pub async fn team_scores(&self, team_id: &str) -> Result<TeamSpiritScores, AppError> {
        let scores = self.repository.list_for_team(team_id).await?;
        let count = scores.len();
        let average_score = if count == 0 {
            0.0
        } else {
            scores.iter().map(|s| f64::from(s.total_score)).sum::<f64>() / count as f64
        };

        Ok(TeamSpiritScores {
            scores,
            average_score,
            count,
        })
    }

    #[instrument(skip(self))]
    pub async fn match_scores(&self, match_id: &str) -> Result<Vec<SpiritScoreModel>, AppError> {
        self.repository.list_for_match(match_id).await
    }

    async fn attach_summary(&self, model: &MatchModel, caller: &Caller) -> Result<(), AppError> {
        let summary = self.summarise(&model.id, &model.team1_id, &model.team2_id).await?;
        self.match_service
            .attach_spirit(&model.id, summary, caller)
            .await?;
        Ok(())
    }

    async fn summarise(
        &self,
        match_id: &str,
        team1_id: &str,
        team2_id: &str,
    ) -> Result<SpiritSummary, AppError> {
        let scores = self.repository.list_for_match(match_id).await?;
        let received = |team_id: &str| -> Option<u32> {
            scores
                .iter()
                .find(|score| score.submitted_for == team_id)
                .map(|score| score.total_score)
        };

        let team1 = received(team1_id);
        let team2 = received(team2_id);
        Ok(SpiritSummary {
            team1_score: team1.unwrap_or(0),
            team2_score: team2.unwrap_or(0),
            submitted: team1.is_some() && team2.is_some(),
        })
    }
}
