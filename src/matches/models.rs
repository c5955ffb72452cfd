use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::stats::StatsState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Postponed,
}

/// Stage of the tournament a match belongs to.
///
/// Serialized as `pool`, `round_of_16`, `quarterfinal`, `semifinal`, `final` or `placement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Round {
    Pool,
    /// Knockout round with the given number of bracket slots (16, 32, ...)
    RoundOf(u32),
    Quarterfinal,
    Semifinal,
    Final,
    Placement,
}

impl Round {
    /// Knockout round tag for a round with `slots` bracket positions
    pub fn for_bracket_slots(slots: u32) -> Self {
        match slots {
            2 => Round::Final,
            4 => Round::Semifinal,
            8 => Round::Quarterfinal,
            n => Round::RoundOf(n),
        }
    }

    /// Number of bracket positions this round is played with, for knockout rounds
    pub fn bracket_slots(&self) -> Option<u32> {
        match self {
            Round::Final => Some(2),
            Round::Semifinal => Some(4),
            Round::Quarterfinal => Some(8),
            Round::RoundOf(n) => Some(*n),
            Round::Pool | Round::Placement => None,
        }
    }

    pub fn is_knockout(&self) -> bool {
        !matches!(self, Round::Pool)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Round::Pool => write!(f, "pool"),
            Round::RoundOf(n) => write!(f, "round_of_{}", n),
            Round::Quarterfinal => write!(f, "quarterfinal"),
            Round::Semifinal => write!(f, "semifinal"),
            Round::Final => write!(f, "final"),
            Round::Placement => write!(f, "placement"),
        }
    }
}

impl FromStr for Round {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pool" => Ok(Round::Pool),
            "quarterfinal" => Ok(Round::Quarterfinal),
            "semifinal" => Ok(Round::Semifinal),
            "final" => Ok(Round::Final),
            "placement" => Ok(Round::Placement),
            other => other
                .strip_prefix("round_of_")
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|n| n.is_power_of_two() && *n >= 16)
                .map(Round::RoundOf)
                .ok_or_else(|| format!("unknown round: {}", other)),
        }
    }
}

impl From<Round> for String {
    fn from(round: Round) -> Self {
        round.to_string()
    }
}

impl TryFrom<String> for Round {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringEventKind {
    #[default]
    Play,
    /// Adjustment recorded when a score is overwritten directly
    Correction,
}

/// One entry in a match's append-only scoring log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringEvent {
    pub team_id: String,
    pub player_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub points: i32,
    #[serde(default)]
    pub kind: ScoringEventKind,
}

/// Spirit ratings received by each side, rebuilt from the submitted spirit scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiritSummary {
    /// Rating received by team1
    pub team1_score: u32,
    /// Rating received by team2
    pub team2_score: u32,
    /// Both teams have rated each other
    pub submitted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchModel {
    pub id: String,
    pub tournament_id: String,
    pub field: String,
    pub field_number: Option<u32>,
    pub team1_id: String,
    pub team2_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: MatchStatus,
    pub score1: u32,
    pub score2: u32,
    pub round: Round,
    /// Index of the match within its knockout round
    pub bracket_position: Option<u32>,
    pub spirit: Option<SpiritSummary>,
    pub scoring_history: Vec<ScoringEvent>,
    pub notes: Option<String>,
    #[serde(default)]
    pub stats: StatsState,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Slot and pairing for a match about to be created
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub tournament_id: String,
    pub field: String,
    pub field_number: Option<u32>,
    pub team1_id: String,
    pub team2_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub round: Round,
    pub bracket_position: Option<u32>,
}

impl MatchModel {
    /// Validates the pairing and time range and builds a scheduled match
    pub fn new(new_match: NewMatch) -> Result<Self, String> {
        if new_match.team1_id == new_match.team2_id {
            return Err("A team cannot play itself".to_string());
        }
        if new_match.end_time <= new_match.start_time {
            return Err("Match end time must be after its start time".to_string());
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            tournament_id: new_match.tournament_id,
            field: new_match.field,
            field_number: new_match.field_number,
            team1_id: new_match.team1_id,
            team2_id: new_match.team2_id,
            start_time: new_match.start_time,
            end_time: new_match.end_time,
            status: MatchStatus::Scheduled,
            score1: 0,
            score2: 0,
            round: new_match.round,
            bracket_position: new_match.bracket_position,
            spirit: None,
            scoring_history: Vec::new(),
            notes: None,
            stats: StatsState::NotApplied,
            updated_by: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.team1_id == team_id || self.team2_id == team_id
    }

    /// Winner of a completed match; `None` for draws and unfinished matches
    pub fn winner(&self) -> Option<&str> {
        if self.status != MatchStatus::Completed {
            return None;
        }
        match self.score1.cmp(&self.score2) {
            std::cmp::Ordering::Greater => Some(self.team1_id.as_str()),
            std::cmp::Ordering::Less => Some(self.team2_id.as_str()),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn loser(&self) -> Option<&str> {
        let winner = self.winner()?;
        if winner == self.team1_id {
            Some(self.team2_id.as_str())
        } else {
            Some(self.team1_id.as_str())
        }
    }

    /// Sum of logged points for one team
    pub fn logged_points(&self, team_id: &str) -> i64 {
        self.scoring_history
            .iter()
            .filter(|event| event.team_id == team_id)
            .map(|event| i64::from(event.points))
            .sum()
    }

    /// Appends a scoring event and moves the named team's score with it
    pub fn record_event(&mut self, event: ScoringEvent) -> Result<(), String> {
        let current = if event.team_id == self.team1_id {
            self.score1
        } else if event.team_id == self.team2_id {
            self.score2
        } else {
            return Err("Team is not playing in this match".to_string());
        };

        let updated = i64::from(current) + i64::from(event.points);
        let updated = u32::try_from(updated)
            .map_err(|_| "Score cannot become negative".to_string())?;

        if event.team_id == self.team1_id {
            self.score1 = updated;
        } else {
            self.score2 = updated;
        }
        self.scoring_history.push(event);
        Ok(())
    }
}

/// Filters accepted by match listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchFilter {
    pub tournament_id: Option<String>,
    pub team_id: Option<String>,
    pub status: Option<MatchStatus>,
    /// Calendar day (UTC) the match starts on
    pub date: Option<chrono::NaiveDate>,
}

impl MatchFilter {
    pub fn for_tournament(tournament_id: &str) -> Self {
        Self {
            tournament_id: Some(tournament_id.to_string()),
            ..Self::default()
        }
    }

    pub fn matches(&self, model: &MatchModel) -> bool {
        self.tournament_id
            .as_deref()
            .map_or(true, |id| model.tournament_id == id)
            && self.team_id.as_deref().map_or(true, |id| model.involves(id))
            && self.status.map_or(true, |status| model.status == status)
            && self
                .date
                .map_or(true, |date| model.start_time.date_naive() == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn new_match(team1: &str, team2: &str) -> NewMatch {
        let start = Utc.with_ymd_and_hms(2025, 7, 5, 9, 0, 0).unwrap();
        NewMatch {
            tournament_id: "t-1".to_string(),
            field: "North".to_string(),
            field_number: Some(1),
            team1_id: team1.to_string(),
            team2_id: team2.to_string(),
            start_time: start,
            end_time: start + Duration::minutes(60),
            round: Round::Pool,
            bracket_position: None,
        }
    }

    fn play(team_id: &str, points: i32) -> ScoringEvent {
        ScoringEvent {
            team_id: team_id.to_string(),
            player_id: Some("p-1".to_string()),
            timestamp: Utc::now(),
            points,
            kind: ScoringEventKind::Play,
        }
    }

    #[test]
    fn rejects_self_pairing_and_inverted_times() {
        assert!(MatchModel::new(new_match("a", "a")).is_err());

        let mut inverted = new_match("a", "b");
        inverted.end_time = inverted.start_time;
        assert!(MatchModel::new(inverted).is_err());
    }

    #[test]
    fn round_tags_round_trip_as_strings() {
        for (round, tag) in [
            (Round::Pool, "pool"),
            (Round::RoundOf(16), "round_of_16"),
            (Round::Quarterfinal, "quarterfinal"),
            (Round::Semifinal, "semifinal"),
            (Round::Final, "final"),
            (Round::Placement, "placement"),
        ] {
            assert_eq!(serde_json::to_value(round).unwrap(), serde_json::json!(tag));
            assert_eq!(tag.parse::<Round>().unwrap(), round);
        }
        assert!("round_of_3".parse::<Round>().is_err());
        assert_eq!(Round::for_bracket_slots(8), Round::Quarterfinal);
        assert_eq!(Round::for_bracket_slots(32), Round::RoundOf(32));
    }

    #[test]
    fn record_event_moves_named_team_score() {
        let mut model = MatchModel::new(new_match("a", "b")).unwrap();

        model.record_event(play("a", 1)).unwrap();
        model.record_event(play("b", 2)).unwrap();

        assert_eq!((model.score1, model.score2), (1, 2));
        assert_eq!(model.logged_points("b"), 2);
        assert!(model.record_event(play("c", 1)).is_err());
        assert!(model.record_event(play("a", -5)).is_err());
        assert_eq!(model.scoring_history.len(), 2);
    }

    #[test]
    fn winner_only_for_decided_completed_matches() {
        let mut model = MatchModel::new(new_match("a", "b")).unwrap();
        model.score1 = 3;
        assert_eq!(model.winner(), None);

        model.status = MatchStatus::Completed;
        assert_eq!(model.winner(), Some("a"));
        assert_eq!(model.loser(), Some("b"));

        model.score2 = 3;
        assert_eq!(model.winner(), None);
    }

    #[test]
    fn filter_by_team_and_date() {
        let model = MatchModel::new(new_match("a", "b")).unwrap();

        let by_team = MatchFilter {
            team_id: Some("b".to_string()),
            ..MatchFilter::default()
        };
        assert!(by_team.matches(&model));

        let other_day = MatchFilter {
            date: chrono::NaiveDate::from_ymd_opt(2025, 7, 6),
            ..MatchFilter::default()
        };
        assert!(!other_day.matches(&model));
        assert!(MatchFilter::for_tournament("t-1").matches(&model));
    }
}
