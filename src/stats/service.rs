use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::{MatchOutcome, StatsError, StatsState};
use crate::{
    locks::KeyedLocks,
    matches::models::MatchModel,
    team::{models::TeamModel, repository::TeamRepository},
};

/// What a sync did to the teams' statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsChange {
    Unchanged,
    Applied,
    Reverted,
    /// A previously applied outcome was replaced by a corrected one
    Reapplied,
}

#[derive(Debug, Clone)]
pub struct StatsSync {
    pub change: StatsChange,
    /// Both teams as written, empty when nothing changed
    pub teams: Vec<TeamModel>,
}

impl StatsSync {
    fn unchanged() -> Self {
        Self {
            change: StatsChange::Unchanged,
            teams: Vec::new(),
        }
    }
}

/// Keeps team statistics consistent with the matches that have been completed.
///
/// Each match carries a [`StatsState`] recording the outcome currently folded into the
/// teams. `sync_match` compares it with the outcome the match should contribute and
/// applies only the difference, so calling it repeatedly is a no-op.
///
/// Both teams stay locked in `team_locks` from the read to the write, so matches that
/// share a team are folded in one after the other.
pub struct StatsService {
    team_repository: Arc<dyn TeamRepository + Send + Sync>,
    team_locks: Arc<KeyedLocks>,
}

impl StatsService {
    pub fn new(
        team_repository: Arc<dyn TeamRepository + Send + Sync>,
        team_locks: Arc<KeyedLocks>,
    ) -> Self {
        Self {
            team_repository,
            team_locks,
        }
    }

    /// Brings both teams' statistics in line with `model` and updates its stats state.
    ///
    /// The caller must persist `model` afterwards and hold the match lock throughout.
    #[instrument(skip(self, model), fields(match_id = %model.id))]
    pub async fn sync_match(&self, model: &mut MatchModel) -> Result<StatsSync, StatsError> {
        let desired = MatchOutcome::from_match(model);
        let current = model.stats.applied_outcome();

        if desired == current {
            debug!("Statistics already reflect this match");
            return Ok(StatsSync::unchanged());
        }

        let _guards = self
            .team_locks
            .lock_all(&[model.team1_id.as_str(), model.team2_id.as_str()])
            .await;

        let mut team1 = self.load_team(&model.team1_id).await?;
        let mut team2 = self.load_team(&model.team2_id).await?;

        if let Some(previous) = current {
            previous.revert_from(&mut team1.statistics, &mut team2.statistics);
        }
        if let Some(next) = desired {
            next.apply_to(&mut team1.statistics, &mut team2.statistics)
                .map_err(|reason| {
                    warn!(match_id = %model.id, reason = %reason, "Match result rejected");
                    StatsError::Overflow(reason)
                })?;
        }

        self.team_repository
            .update_statistics_pair(&team1, &team2)
            .await
            .map_err(|e| {
                error!(
                    match_id = %model.id,
                    team1_id = %team1.id,
                    team2_id = %team2.id,
                    error = %e,
                    "Failed to write team statistics"
                );
                StatsError::from(e)
            })?;

        let now = Utc::now();
        let change = match (current, desired) {
            (None, Some(_)) => StatsChange::Applied,
            (Some(_), None) => StatsChange::Reverted,
            (Some(_), Some(_)) => StatsChange::Reapplied,
            (None, None) => StatsChange::Unchanged,
        };
        model.stats = match desired {
            Some(outcome) => StatsState::Applied {
                outcome,
                applied_at: now,
            },
            None => StatsState::Reverted { reverted_at: now },
        };

        info!(
            team1_id = %team1.id,
            team2_id = %team2.id,
            change = ?change,
            "Team statistics synchronised"
        );
        Ok(StatsSync {
            change,
            teams: vec![team1, team2],
        })
    }

    async fn load_team(&self, team_id: &str) -> Result<TeamModel, StatsError> {
        self.team_repository
            .get_team(team_id)
            .await?
            .ok_or_else(|| StatsError::TeamNotFound(team_id.to_string()))
    }
}
