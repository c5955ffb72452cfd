use serde::{Deserialize, Serialize};

use crate::team::models::TeamStatistics;

/// Facts published to live viewers of a tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TournamentEvent {
    /// New matches were added to the schedule
    MatchesScheduled { match_ids: Vec<String> },

    /// The running score of a match changed
    ScoreUpdated {
        match_id: String,
        score1: u32,
        score2: u32,
    },

    /// A match reached its final score
    MatchCompleted {
        match_id: String,
        score1: u32,
        score2: u32,
    },

    /// Cumulative statistics of a team changed
    StatsUpdated {
        team_id: String,
        statistics: TeamStatistics,
    },
}

impl TournamentEvent {
    /// Get a short name of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            TournamentEvent::MatchesScheduled { .. } => "matches_scheduled",
            TournamentEvent::ScoreUpdated { .. } => "score_updated",
            TournamentEvent::MatchCompleted { .. } => "match_completed",
            TournamentEvent::StatsUpdated { .. } => "stats_updated",
        }
    }
}
