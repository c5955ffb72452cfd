use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matches::models::{MatchModel, MatchStatus};
use crate::team::models::TeamStatistics;

/// Contribution of one completed match to both teams' statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub score1: u32,
    pub score2: u32,
    /// Spirit rating received by team1, present once both sides have rated
    pub team1_spirit: Option<u32>,
    pub team2_spirit: Option<u32>,
}

impl MatchOutcome {
    /// Outcome the match should contribute right now; `None` unless it is completed
    pub fn from_match(model: &MatchModel) -> Option<Self> {
        if model.status != MatchStatus::Completed {
            return None;
        }

        let spirit = model.spirit.filter(|summary| summary.submitted);
        Some(Self {
            score1: model.score1,
            score2: model.score2,
            team1_spirit: spirit.map(|summary| summary.team1_score),
            team2_spirit: spirit.map(|summary| summary.team2_score),
        })
    }

    pub fn apply_to(
        &self,
        team1: &mut TeamStatistics,
        team2: &mut TeamStatistics,
    ) -> Result<(), String> {
        team1.record(self.score1, self.score2, self.team1_spirit)?;
        team2.record(self.score2, self.score1, self.team2_spirit)
    }

    pub fn revert_from(&self, team1: &mut TeamStatistics, team2: &mut TeamStatistics) {
        team1.unrecord(self.score1, self.score2, self.team1_spirit);
        team2.unrecord(self.score2, self.score1, self.team2_spirit);
    }
}

/// Whether a match's outcome is currently folded into team statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatsState {
    #[default]
    NotApplied,
    Applied {
        outcome: MatchOutcome,
        applied_at: DateTime<Utc>,
    },
    Reverted {
        reverted_at: DateTime<Utc>,
    },
}

impl StatsState {
    pub fn applied_outcome(&self) -> Option<MatchOutcome> {
        match self {
            StatsState::Applied { outcome, .. } => Some(*outcome),
            StatsState::NotApplied | StatsState::Reverted { .. } => None,
        }
    }
}
