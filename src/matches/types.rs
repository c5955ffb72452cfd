use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::models::{MatchStatus, Round};

/// Request payload for creating a match by hand
#[derive(Debug, Deserialize)]
pub struct MatchCreateRequest {
    pub tournament_id: String,
    pub field: String,
    pub field_number: Option<u32>,
    pub team1_id: String,
    pub team2_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub round: Option<Round>,
}

/// Fields a match update may change; teams, scores and status have their own operations
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchUpdateRequest {
    pub field: Option<String>,
    pub field_number: Option<u32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScoreUpdateRequest {
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub status: Option<MatchStatus>,
}

fn default_points() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct ScoringEventRequest {
    pub team_id: String,
    pub player_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default = "default_points")]
    pub points: i32,
}
