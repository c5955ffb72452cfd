use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    bracket::{Bracket, BracketPairing},
    errors::ScheduleError,
    round_robin,
    slots::ScheduleConfig,
    types::{ScheduleRequest, ScheduleType},
};
use crate::{
    auth::Caller,
    event::{EventBus, TournamentEvent},
    matches::{
        models::{MatchFilter, MatchModel, NewMatch, Round},
        repository::MatchRepository,
    },
    shared::AppError,
    stats::standings::rank_teams,
    team::{models::TeamModel, repository::TeamRepository},
    tournament::{models::TournamentModel, repository::TournamentRepository, types::StandingsOrder},
};

/// Generates pool and bracket matches for a tournament
pub struct ScheduleService {
    tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
    team_repository: Arc<dyn TeamRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    event_bus: EventBus,
}

impl ScheduleService {
    pub fn new(
        tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
        team_repository: Arc<dyn TeamRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            tournament_repository,
            team_repository,
            match_repository,
            event_bus,
        }
    }

    #[instrument(skip(self, request), fields(schedule_type = ?request.schedule_type))]
    pub async fn generate(
        &self,
        tournament_id: &str,
        request: ScheduleRequest,
        caller: &Caller,
    ) -> Result<Vec<MatchModel>, AppError> {
        caller.require_director()?;

        let mut tournament = self.load_tournament(tournament_id).await?;
        let config = ScheduleConfig::new(
            request.start_date,
            request.end_date,
            request.match_duration_minutes,
            &request.daily_start_time,
            &request.daily_end_time,
        )?;
        let existing = self
            .match_repository
            .list_matches(&MatchFilter::for_tournament(tournament_id))
            .await?;

        let matches = match request.schedule_type {
            ScheduleType::RoundRobin => {
                if existing.iter().any(|m| m.round == Round::Pool) {
                    return Err(ScheduleError::AlreadyScheduled("pool").into());
                }
                self.round_robin(&tournament, &config).await?
            }
            ScheduleType::Bracket => {
                if existing.iter().any(|m| m.round.is_knockout()) {
                    return Err(ScheduleError::AlreadyScheduled("bracket").into());
                }
                let bracket = self.seed_bracket(&tournament).await?;
                let pairings = bracket.first_round_pairings();
                let matches =
                    place_pairings(&tournament, &config, &pairings, latest_end(&existing))?;
                tournament.bracket = Some(bracket);
                matches
            }
        };

        tournament.schedule = Some(config);
        self.store(&mut tournament, &matches).await?;

        info!(
            tournament_id = %tournament.id,
            match_count = matches.len(),
            "Schedule generated"
        );
        Ok(matches)
    }

    /// Schedules the next knockout round once the current one is decided
    #[instrument(skip(self))]
    pub async fn advance_bracket(
        &self,
        tournament_id: &str,
        caller: &Caller,
    ) -> Result<Vec<MatchModel>, AppError> {
        caller.require_director()?;

        let mut tournament = self.load_tournament(tournament_id).await?;
        let bracket = tournament
            .bracket
            .clone()
            .ok_or(ScheduleError::BracketNotStarted)?;
        let config = tournament.schedule.clone().ok_or_else(|| {
            AppError::InvalidInput("Tournament has no schedule configuration".to_string())
        })?;

        let existing = self
            .match_repository
            .list_matches(&MatchFilter::for_tournament(tournament_id))
            .await?;
        let knockout: Vec<MatchModel> = existing
            .iter()
            .filter(|m| m.round.is_knockout())
            .cloned()
            .collect();

        let pairings = bracket.next_round(&knockout)?;
        let matches = place_pairings(&tournament, &config, &pairings, latest_end(&existing))?;
        self.store(&mut tournament, &matches).await?;

        info!(
            tournament_id = %tournament.id,
            match_count = matches.len(),
            "Bracket advanced"
        );
        Ok(matches)
    }

    async fn load_tournament(&self, tournament_id: &str) -> Result<TournamentModel, AppError> {
        Ok(self
            .tournament_repository
            .get_tournament(tournament_id)
            .await?
            .ok_or(ScheduleError::TournamentNotFound)?)
    }

    /// Approved teams in registration order
    async fn approved_teams(&self, tournament: &TournamentModel) -> Result<Vec<TeamModel>, AppError> {
        let mut teams: Vec<_> = self
            .team_repository
            .list_teams(Some(&tournament.id))
            .await?
            .into_iter()
            .filter(|team| team.is_approved())
            .collect();
        teams.sort_by_key(|team| tournament.registration_index(&team.id).unwrap_or(usize::MAX));
        Ok(teams)
    }

    async fn round_robin(
        &self,
        tournament: &TournamentModel,
        config: &ScheduleConfig,
    ) -> Result<Vec<MatchModel>, AppError> {
        let team_ids: Vec<String> = self
            .approved_teams(tournament)
            .await?
            .into_iter()
            .map(|team| team.id)
            .collect();

        let plan = round_robin::plan(&team_ids, &tournament.fields, config)?;

        plan.matches
            .into_iter()
            .map(|planned| {
                MatchModel::new(NewMatch {
                    tournament_id: tournament.id.clone(),
                    field: planned.slot.field.name,
                    field_number: planned.slot.field.field_number,
                    team1_id: planned.team1_id,
                    team2_id: planned.team2_id,
                    start_time: planned.slot.start,
                    end_time: planned.slot.end,
                    round: Round::Pool,
                    bracket_position: None,
                })
                .map_err(AppError::InvalidInput)
            })
            .collect()
    }

    /// Seeds approved teams by their current standing
    async fn seed_bracket(&self, tournament: &TournamentModel) -> Result<Bracket, AppError> {
        let teams = self.approved_teams(tournament).await?;
        let seeds = rank_teams(&teams, StandingsOrder::Results)
            .into_iter()
            .map(|row| row.team_id)
            .collect();
        Ok(Bracket::seeded(seeds)?)
    }

    async fn store(
        &self,
        tournament: &mut TournamentModel,
        matches: &[MatchModel],
    ) -> Result<(), AppError> {
        self.match_repository.create_matches(matches).await?;

        tournament
            .match_ids
            .extend(matches.iter().map(|m| m.id.clone()));
        self.tournament_repository
            .update_tournament(tournament)
            .await?;

        self.event_bus
            .emit(
                &tournament.id,
                TournamentEvent::MatchesScheduled {
                    match_ids: matches.iter().map(|m| m.id.clone()).collect(),
                },
            )
            .await;
        Ok(())
    }
}

fn latest_end(matches: &[MatchModel]) -> Option<DateTime<Utc>> {
    matches.iter().map(|m| m.end_time).max()
}

/// Puts knockout pairings on the first free slots after `not_before`
fn place_pairings(
    tournament: &TournamentModel,
    config: &ScheduleConfig,
    pairings: &[BracketPairing],
    not_before: Option<DateTime<Utc>>,
) -> Result<Vec<MatchModel>, AppError> {
    if tournament.fields.is_empty() {
        return Err(ScheduleError::NoFieldsConfigured.into());
    }

    let slots: Vec<_> = config
        .slots_from(&tournament.fields, not_before)
        .take(pairings.len())
        .collect();
    if slots.len() < pairings.len() {
        return Err(ScheduleError::InsufficientSlots {
            needed: pairings.len(),
            available: slots.len(),
        }
        .into());
    }

    pairings
        .iter()
        .zip(slots)
        .map(|(pairing, slot)| {
            MatchModel::new(NewMatch {
                tournament_id: tournament.id.clone(),
                field: slot.field.name,
                field_number: slot.field.field_number,
                team1_id: pairing.team1_id.clone(),
                team2_id: pairing.team2_id.clone(),
                start_time: slot.start,
                end_time: slot.end,
                round: pairing.round,
                bracket_position: Some(pairing.position),
            })
            .map_err(AppError::InvalidInput)
        })
        .collect()
}
