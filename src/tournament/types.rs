use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::models::TournamentStatus;

/// Request payload for creating a tournament
#[derive(Debug, Deserialize)]
pub struct TournamentCreateRequest {
    pub name: String,
    pub description: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_teams: Option<u32>,
    pub spirit_score_enabled: Option<bool>,
}

/// Fields a tournament update may change; anything else in the body is rejected
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TournamentUpdateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<TournamentStatus>,
    pub max_teams: Option<u32>,
    pub spirit_score_enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct FieldCreateRequest {
    pub name: String,
    pub field_number: Option<u32>,
    pub location: Option<String>,
    pub capacity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AnnouncementCreateRequest {
    pub title: String,
    pub content: String,
}

/// Ordering of the standings table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingsOrder {
    #[default]
    Results,
    Spirit,
}

#[derive(Debug, Default, Deserialize)]
pub struct StandingsQuery {
    #[serde(default)]
    pub order: StandingsOrder,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
}
