use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleType {
    #[serde(rename = "round-robin")]
    RoundRobin,
    #[serde(rename = "bracket")]
    Bracket,
}

fn default_match_duration() -> i64 {
    60
}

/// Request payload for POST /tournaments/:id/schedule
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub schedule_type: ScheduleType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_match_duration")]
    pub match_duration_minutes: i64,
    pub daily_start_time: String,
    pub daily_end_time: String,
}
