use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TeamStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RosterRole {
    Captain,
    CoCaptain,
    #[default]
    Player,
    Substitute,
}

/// One player on a team roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: String,
    pub jersey_number: Option<u32>,
    pub jersey_verified: bool,
    pub role: RosterRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JerseyColors {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

/// Cumulative results of a team, mutated only by the stats aggregator.
///
/// `matches_played == wins + losses + draws` holds after every `record`/`unrecord` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStatistics {
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub spirit_score: u32,
}

impl TeamStatistics {
    /// Adds one finished match seen from this team's side.
    ///
    /// Leaves the statistics untouched and returns an error if any counter would overflow.
    pub fn record(
        &mut self,
        scored: u32,
        conceded: u32,
        spirit_received: Option<u32>,
    ) -> Result<(), String> {
        let overflow = || "Team statistics would overflow".to_string();
        let mut next = *self;

        next.matches_played = next.matches_played.checked_add(1).ok_or_else(overflow)?;
        next.goals_scored = next.goals_scored.checked_add(scored).ok_or_else(overflow)?;
        next.goals_conceded = next.goals_conceded.checked_add(conceded).ok_or_else(overflow)?;

        let tally = match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => &mut next.wins,
            std::cmp::Ordering::Less => &mut next.losses,
            std::cmp::Ordering::Equal => &mut next.draws,
        };
        *tally = tally.checked_add(1).ok_or_else(overflow)?;

        if let Some(spirit) = spirit_received {
            next.spirit_score = next.spirit_score.checked_add(spirit).ok_or_else(overflow)?;
        }

        *self = next;
        Ok(())
    }

    /// Removes a match previously added with the same arguments
    pub fn unrecord(&mut self, scored: u32, conceded: u32, spirit_received: Option<u32>) {
        self.matches_played = self.matches_played.saturating_sub(1);
        self.goals_scored = self.goals_scored.saturating_sub(scored);
        self.goals_conceded = self.goals_conceded.saturating_sub(conceded);

        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => self.wins = self.wins.saturating_sub(1),
            std::cmp::Ordering::Less => self.losses = self.losses.saturating_sub(1),
            std::cmp::Ordering::Equal => self.draws = self.draws.saturating_sub(1),
        }

        if let Some(spirit) = spirit_received {
            self.spirit_score = self.spirit_score.saturating_sub(spirit);
        }
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_scored) - i64::from(self.goals_conceded)
    }

    /// League points: three per win, one per draw
    pub fn points(&self) -> u32 {
        self.wins.saturating_mul(3).saturating_add(self.draws)
    }

    pub fn spirit_average(&self) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        f64::from(self.spirit_score) / f64::from(self.matches_played)
    }
}

/// Team document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamModel {
    pub id: String,
    pub tournament_id: String,
    pub name: String,
    pub captain_id: String,
    pub co_captain_id: Option<String>,
    pub roster: Vec<RosterEntry>,
    pub status: TeamStatus,
    pub registered_by: String,
    pub roster_locked: bool,
    pub jersey_colors: Option<JerseyColors>,
    pub statistics: TeamStatistics,
    pub created_at: DateTime<Utc>,
}

impl TeamModel {
    pub fn new(
        tournament_id: String,
        name: String,
        captain_id: String,
        registered_by: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tournament_id,
            name,
            captain_id,
            co_captain_id: None,
            roster: Vec::new(),
            status: TeamStatus::Pending,
            registered_by,
            roster_locked: false,
            jersey_colors: None,
            statistics: TeamStatistics::default(),
            created_at: Utc::now(),
        }
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.roster.iter().any(|entry| entry.player_id == player_id)
    }

    pub fn jersey_taken(&self, jersey_number: u32) -> bool {
        self.roster
            .iter()
            .any(|entry| entry.jersey_number == Some(jersey_number))
    }

    pub fn is_approved(&self) -> bool {
        self.status == TeamStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(stats: &TeamStatistics) {
        assert_eq!(stats.matches_played, stats.wins + stats.losses + stats.draws);
    }

    #[test]
    fn record_win_loss_and_draw() {
        let mut stats = TeamStatistics::default();

        stats.record(5, 3, None).unwrap();
        stats.record(1, 4, Some(12)).unwrap();
        stats.record(2, 2, None).unwrap();

        assert_eq!(stats.matches_played, 3);
        assert_eq!((stats.wins, stats.losses, stats.draws), (1, 1, 1));
        assert_eq!(stats.goals_scored, 8);
        assert_eq!(stats.goals_conceded, 9);
        assert_eq!(stats.spirit_score, 12);
        assert_eq!(stats.goal_difference(), -1);
        assert_eq!(stats.points(), 4);
        assert_consistent(&stats);
    }

    #[test]
    fn unrecord_reverses_record() {
        let mut stats = TeamStatistics::default();
        stats.record(3, 1, Some(10)).unwrap();
        let snapshot = stats;

        stats.record(0, 0, Some(8)).unwrap();
        stats.unrecord(0, 0, Some(8));

        assert_eq!(stats, snapshot);
        assert_consistent(&stats);
    }

    #[test]
    fn record_rejects_overflow_without_partial_update() {
        let mut stats = TeamStatistics::default();
        let huge = i32::MAX as u32;
        stats.record(huge, 0, None).unwrap();
        stats.record(huge, 0, None).unwrap();
        let before = stats;

        assert!(stats.record(huge, 0, None).is_err());
        assert_eq!(stats, before);
        assert_eq!(stats.matches_played, 2);
    }

    #[test]
    fn spirit_average_of_unplayed_team_is_zero() {
        let stats = TeamStatistics::default();
        assert_eq!(stats.spirit_average(), 0.0);
    }

    #[test]
    fn roster_lookups() {
        let mut team = TeamModel::new(
            "t".to_string(),
            "Discs".to_string(),
            "captain".to_string(),
            "user".to_string(),
        );
        team.roster.push(RosterEntry {
            player_id: "p-1".to_string(),
            jersey_number: Some(7),
            jersey_verified: false,
            role: RosterRole::Player,
            joined_at: Utc::now(),
        });

        assert!(team.has_player("p-1"));
        assert!(!team.has_player("p-2"));
        assert!(team.jersey_taken(7));
        assert!(!team.jersey_taken(8));
        assert_eq!(team.status, TeamStatus::Pending);
    }
}
