use tracing::{debug, warn};

use super::{
    errors::ScheduleError,
    slots::{ScheduleConfig, Slot},
};
use crate::tournament::models::FieldModel;

/// A pairing placed on a slot
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMatch {
    pub team1_id: String,
    pub team2_id: String,
    pub slot: Slot,
}

#[derive(Debug, Clone)]
pub struct RoundRobinPlan {
    pub matches: Vec<PlannedMatch>,
    /// Pairings left over once every slot was used
    pub dropped: usize,
}

/// Every unordered pair of `teams`, first team ascending, second team ascending
pub fn pairings<T: Clone>(teams: &[T]) -> Vec<(T, T)> {
    let mut pairs = Vec::with_capacity(teams.len() * teams.len().saturating_sub(1) / 2);
    for (i, first) in teams.iter().enumerate() {
        for second in &teams[i + 1..] {
            pairs.push((first.clone(), second.clone()));
        }
    }
    pairs
}

/// Assigns the canonical pairings of `team_ids` to slots in day, slot, field order.
///
/// Duplicate ids are ignored. Pairings beyond the available capacity are dropped.
pub fn plan(
    team_ids: &[String],
    fields: &[FieldModel],
    config: &ScheduleConfig,
) -> Result<RoundRobinPlan, ScheduleError> {
    let mut teams: Vec<String> = Vec::with_capacity(team_ids.len());
    for id in team_ids {
        if !teams.contains(id) {
            teams.push(id.clone());
        }
    }

    if teams.len() < 2 {
        return Err(ScheduleError::InsufficientTeams { found: teams.len() });
    }
    if fields.is_empty() {
        return Err(ScheduleError::NoFieldsConfigured);
    }

    let pairs = pairings(&teams);
    let total = pairs.len();

    let matches: Vec<PlannedMatch> = pairs
        .into_iter()
        .zip(config.slots(fields))
        .map(|((team1_id, team2_id), slot)| PlannedMatch {
            team1_id,
            team2_id,
            slot,
        })
        .collect();

    let dropped = total - matches.len();
    if dropped > 0 {
        warn!(
            pairings = total,
            capacity = config.capacity(fields.len()),
            dropped,
            "Not enough slots for a full round robin, dropping pairings"
        );
    }
    debug!(teams = teams.len(), scheduled = matches.len(), "Round robin planned");

    Ok(RoundRobinPlan { matches, dropped })
}
