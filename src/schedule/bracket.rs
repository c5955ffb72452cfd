use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::ScheduleError;
use crate::matches::models::{MatchModel, MatchStatus, Round};

/// Seeded single-elimination bracket.
///
/// `slots` has a power-of-two length; position `2k` meets position `2k + 1` in the first
/// round. Seeds are laid out so that seed 1 meets the lowest seed and the top seeds
/// receive the byes (`None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub slots: Vec<Option<String>>,
}

/// Two teams meeting at a bracket position
#[derive(Debug, Clone, PartialEq)]
pub struct BracketPairing {
    pub round: Round,
    pub position: u32,
    pub team1_id: String,
    pub team2_id: String,
}

/// Seed numbers (1-based) in bracket order for a bracket of `size` positions
fn seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let next_len = order.len() * 2;
        order = order
            .iter()
            .flat_map(|&seed| [seed, next_len + 1 - seed])
            .collect();
    }
    order
}

impl Bracket {
    /// Builds a bracket from team ids ordered best seed first
    pub fn seeded(team_ids: Vec<String>) -> Result<Self, ScheduleError> {
        if team_ids.len() < 2 {
            return Err(ScheduleError::InsufficientTeams {
                found: team_ids.len(),
            });
        }

        let size = team_ids.len().next_power_of_two();
        let slots = seed_order(size)
            .into_iter()
            .map(|seed| team_ids.get(seed - 1).cloned())
            .collect();

        debug!(teams = team_ids.len(), size, "Bracket seeded");
        Ok(Self { slots })
    }

    pub fn size(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn first_round(&self) -> Round {
        Round::for_bracket_slots(self.size())
    }

    /// Matches of the first round; teams paired with a bye are not listed
    pub fn first_round_pairings(&self) -> Vec<BracketPairing> {
        let round = self.first_round();
        self.slots
            .chunks(2)
            .enumerate()
            .filter_map(|(position, pair)| match pair {
                [Some(team1_id), Some(team2_id)] => Some(BracketPairing {
                    round,
                    position: position as u32,
                    team1_id: team1_id.clone(),
                    team2_id: team2_id.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Pairings of the round after the latest fully played one.
    ///
    /// `knockout_matches` are all bracket matches of the tournament. When the next round is
    /// the final, a placement match between the semifinal losers is added.
    pub fn next_round(
        &self,
        knockout_matches: &[MatchModel],
    ) -> Result<Vec<BracketPairing>, ScheduleError> {
        let current = knockout_matches
            .iter()
            .filter_map(|m| m.round.bracket_slots())
            .min()
            .ok_or(ScheduleError::BracketNotStarted)?;

        if current <= 2 {
            return Err(ScheduleError::BracketComplete);
        }

        let round_matches: Vec<&MatchModel> = knockout_matches
            .iter()
            .filter(|m| m.round.bracket_slots() == Some(current))
            .collect();

        let winners = self.advancing(current, &round_matches)?;
        let next = Round::for_bracket_slots(current / 2);

        let mut pairings: Vec<BracketPairing> = winners
            .chunks(2)
            .enumerate()
            .filter_map(|(position, pair)| match pair {
                [team1_id, team2_id] => Some(BracketPairing {
                    round: next,
                    position: position as u32,
                    team1_id: team1_id.clone(),
                    team2_id: team2_id.clone(),
                }),
                _ => None,
            })
            .collect();

        if next == Round::Final {
            let losers: Vec<&str> = round_matches.iter().filter_map(|m| m.loser()).collect();
            if let [team1_id, team2_id] = losers.as_slice() {
                pairings.push(BracketPairing {
                    round: Round::Placement,
                    position: 0,
                    team1_id: team1_id.to_string(),
                    team2_id: team2_id.to_string(),
                });
            }
        }

        Ok(pairings)
    }

    /// Winners of a round played with `round_slots` positions, in bracket order
    fn advancing(
        &self,
        round_slots: u32,
        round_matches: &[&MatchModel],
    ) -> Result<Vec<String>, ScheduleError> {
        let is_first_round = round_slots == self.size();
        let mut winners = Vec::with_capacity(round_slots as usize / 2);

        for position in 0..round_slots / 2 {
            let played = round_matches
                .iter()
                .find(|m| m.bracket_position == Some(position));

            match played {
                Some(m) => {
                    if m.status != MatchStatus::Completed {
                        return Err(ScheduleError::RoundInProgress {
                            match_id: m.id.clone(),
                        });
                    }
                    let winner = m.winner().ok_or_else(|| ScheduleError::UndecidedMatch {
                        match_id: m.id.clone(),
                    })?;
                    winners.push(winner.to_string());
                }
                None if is_first_round => {
                    let index = position as usize * 2;
                    let bye = self.slots[index]
                        .clone()
                        .or_else(|| self.slots[index + 1].clone())
                        .ok_or(ScheduleError::MissingBracketMatch { position })?;
                    winners.push(bye);
                }
                None => return Err(ScheduleError::MissingBracketMatch { position }),
            }
        }

        Ok(winners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::models::NewMatch;
    use chrono::{Duration, TimeZone, Utc};

    fn teams(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("s{}", i)).collect()
    }

    fn played(pairing: &BracketPairing, score1: u32, score2: u32) -> MatchModel {
        let start = Utc.with_ymd_and_hms(2025, 7, 6, 9, 0, 0).unwrap();
        let mut model = MatchModel::new(NewMatch {
            tournament_id: "t".to_string(),
            field: "North".to_string(),
            field_number: None,
            team1_id: pairing.team1_id.clone(),
            team2_id: pairing.team2_id.clone(),
            start_time: start,
            end_time: start + Duration::minutes(60),
            round: pairing.round,
            bracket_position: Some(pairing.position),
        })
        .unwrap();
        model.score1 = score1;
        model.score2 = score2;
        model.status = MatchStatus::Completed;
        model
    }

    fn pair_names(pairings: &[BracketPairing]) -> Vec<(&str, &str)> {
        pairings
            .iter()
            .map(|p| (p.team1_id.as_str(), p.team2_id.as_str()))
            .collect()
    }

    #[test]
    fn seed_order_is_standard() {
        assert_eq!(seed_order(2), vec![1, 2]);
        assert_eq!(seed_order(4), vec![1, 4, 2, 3]);
        assert_eq!(seed_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    }

    #[test]
    fn byes_go_to_top_seeds() {
        let bracket = Bracket::seeded(teams(5)).unwrap();

        assert_eq!(bracket.size(), 8);
        assert_eq!(bracket.first_round(), Round::Quarterfinal);
        assert_eq!(pair_names(&bracket.first_round_pairings()), vec![("s4", "s5")]);
    }

    #[test]
    fn two_teams_play_the_final() {
        let bracket = Bracket::seeded(teams(2)).unwrap();
        assert_eq!(bracket.first_round(), Round::Final);

        let final_match = played(&bracket.first_round_pairings()[0], 3, 1);
        assert_eq!(
            bracket.next_round(&[final_match]),
            Err(ScheduleError::BracketComplete)
        );
    }

    #[test]
    fn next_round_takes_winners_and_byes() {
        let bracket = Bracket::seeded(teams(6)).unwrap();
        let first = bracket.first_round_pairings();
        assert_eq!(pair_names(&first), vec![("s4", "s5"), ("s3", "s6")]);

        let results = vec![played(&first[0], 1, 4), played(&first[1], 5, 2)];
        let semis = bracket.next_round(&results).unwrap();

        assert!(semis.iter().all(|p| p.round == Round::Semifinal));
        assert_eq!(pair_names(&semis), vec![("s1", "s5"), ("s2", "s3")]);
    }

    #[test]
    fn final_comes_with_placement_match() {
        let bracket = Bracket::seeded(teams(4)).unwrap();
        let semis = bracket.first_round_pairings();
        let results = vec![played(&semis[0], 2, 0), played(&semis[1], 0, 2)];

        let last = bracket.next_round(&results).unwrap();

        assert_eq!(last[0].round, Round::Final);
        assert_eq!(pair_names(&last[..1]), vec![("s1", "s3")]);
        assert_eq!(last[1].round, Round::Placement);
        assert_eq!(pair_names(&last[1..]), vec![("s4", "s2")]);
    }

    #[test]
    fn unfinished_or_drawn_rounds_cannot_advance() {
        let bracket = Bracket::seeded(teams(4)).unwrap();
        let semis = bracket.first_round_pairings();

        let mut open = played(&semis[0], 1, 0);
        open.status = MatchStatus::InProgress;
        let result = bracket.next_round(&[open, played(&semis[1], 1, 0)]);
        assert!(matches!(result, Err(ScheduleError::RoundInProgress { .. })));

        let drawn = played(&semis[0], 2, 2);
        let result = bracket.next_round(&[drawn, played(&semis[1], 1, 0)]);
        assert!(matches!(result, Err(ScheduleError::UndecidedMatch { .. })));
    }

    #[test]
    fn needs_first_round() {
        let bracket = Bracket::seeded(teams(4)).unwrap();
        assert_eq!(bracket.next_round(&[]), Err(ScheduleError::BracketNotStarted));
    }
}
