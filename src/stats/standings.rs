use serde::Serialize;
use std::cmp::Ordering;

use crate::team::models::{TeamModel, TeamStatistics};
use crate::tournament::types::StandingsOrder;

/// One line of a tournament table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub rank: u32,
    pub team_id: String,
    pub name: String,
    pub points: u32,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub goal_difference: i64,
    pub spirit_score: u32,
    pub spirit_average: f64,
}

impl StandingRow {
    fn from_team(team: &TeamModel) -> Self {
        let stats = &team.statistics;
        Self {
            rank: 0,
            team_id: team.id.clone(),
            name: team.name.clone(),
            points: stats.points(),
            played: stats.matches_played,
            wins: stats.wins,
            losses: stats.losses,
            draws: stats.draws,
            goals_scored: stats.goals_scored,
            goals_conceded: stats.goals_conceded,
            goal_difference: stats.goal_difference(),
            spirit_score: stats.spirit_score,
            spirit_average: stats.spirit_average(),
        }
    }
}

/// Wins, then goal difference, then goals scored; all descending
fn compare_results(a: &TeamStatistics, b: &TeamStatistics) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_scored.cmp(&a.goals_scored))
}

fn compare_spirit(a: &TeamStatistics, b: &TeamStatistics) -> Ordering {
    b.spirit_average()
        .partial_cmp(&a.spirit_average())
        .unwrap_or(Ordering::Equal)
        .then_with(|| compare_results(a, b))
}

/// Ranks `teams`, which must be given in registration order; ties keep that order.
pub fn rank_teams(teams: &[TeamModel], order: StandingsOrder) -> Vec<StandingRow> {
    let mut ranked: Vec<&TeamModel> = teams.iter().collect();
    match order {
        StandingsOrder::Results => {
            ranked.sort_by(|a, b| compare_results(&a.statistics, &b.statistics))
        }
        StandingsOrder::Spirit => {
            ranked.sort_by(|a, b| compare_spirit(&a.statistics, &b.statistics))
        }
    }

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, team)| StandingRow {
            rank: index as u32 + 1,
            ..StandingRow::from_team(team)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, record: &[(u32, u32, Option<u32>)]) -> TeamModel {
        let mut team = TeamModel::new("t".into(), name.into(), "c".into(), "m".into());
        for (scored, conceded, spirit) in record {
            team.statistics.record(*scored, *conceded, *spirit).unwrap();
        }
        team
    }

    fn names(rows: &[StandingRow]) -> Vec<&str> {
        rows.iter().map(|row| row.name.as_str()).collect()
    }

    #[test]
    fn ranks_by_wins_then_goal_difference_then_goals() {
        let teams = vec![
            team("Draws", &[(1, 1, None), (2, 2, None)]),
            team("BigWin", &[(9, 1, None), (0, 1, None)]),
            team("SmallWin", &[(2, 1, None), (0, 1, None)]),
            team("Unbeaten", &[(3, 0, None), (3, 0, None)]),
        ];

        let rows = rank_teams(&teams, StandingsOrder::Results);

        assert_eq!(names(&rows), vec!["Unbeaten", "BigWin", "SmallWin", "Draws"]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].points, 6);
        assert_eq!(rows[3].points, 2);
    }

    #[test]
    fn ties_keep_registration_order() {
        let teams = vec![team("First", &[]), team("Second", &[])];
        let rows = rank_teams(&teams, StandingsOrder::Results);
        assert_eq!(names(&rows), vec!["First", "Second"]);
    }

    #[test]
    fn spirit_order_uses_average() {
        let teams = vec![
            team("Rough", &[(5, 0, Some(6)), (5, 0, Some(8))]),
            team("Friendly", &[(0, 5, Some(18))]),
        ];

        let rows = rank_teams(&teams, StandingsOrder::Spirit);

        assert_eq!(names(&rows), vec!["Friendly", "Rough"]);
        assert_eq!(rows[1].spirit_average, 7.0);
    }
}
