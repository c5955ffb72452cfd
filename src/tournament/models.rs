use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::schedule::{bracket::Bracket, ScheduleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TournamentStatus {
    Upcoming,
    Ongoing,
    Completed,
}

/// A playing field; `name` identifies it within the tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldModel {
    pub name: String,
    pub field_number: Option<u32>,
    pub location: Option<String>,
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub title: String,
    pub content: String,
    pub posted_by: String,
    pub created_at: DateTime<Utc>,
}

/// Tournament document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TournamentStatus,
    pub max_teams: Option<u32>,
    pub fields: Vec<FieldModel>,
    /// Registration order of teams
    pub team_ids: Vec<String>,
    pub match_ids: Vec<String>,
    pub organizer_id: String,
    pub spirit_score_enabled: bool,
    pub announcements: Vec<Announcement>,
    /// Slot layout used by the last schedule generation, reused for bracket rounds
    pub schedule: Option<ScheduleConfig>,
    pub bracket: Option<Bracket>,
    pub created_at: DateTime<Utc>,
}

impl TournamentModel {
    pub fn new(
        name: String,
        description: String,
        location: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        organizer_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            location,
            start_date,
            end_date,
            status: TournamentStatus::Upcoming,
            max_teams: None,
            fields: Vec::new(),
            team_ids: Vec::new(),
            match_ids: Vec::new(),
            organizer_id,
            spirit_score_enabled: true,
            announcements: Vec::new(),
            schedule: None,
            bracket: None,
            created_at: Utc::now(),
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Registration position of a team, used as the final tie-breaker in standings
    pub fn registration_index(&self, team_id: &str) -> Option<usize> {
        self.team_ids.iter().position(|id| id == team_id)
    }
}
