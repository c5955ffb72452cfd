use thiserror::Error;

use crate::shared::AppError;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("Tournament not found")]
    TournamentNotFound,

    #[error("At least two approved teams are required, found {found}")]
    InsufficientTeams { found: usize },

    #[error("Tournament has no fields configured")]
    NoFieldsConfigured,

    #[error("Invalid schedule configuration: {0}")]
    InvalidScheduleConfig(String),

    #[error("Tournament already has {0} matches scheduled")]
    AlreadyScheduled(&'static str),

    #[error("Bracket has not been generated")]
    BracketNotStarted,

    #[error("Bracket is already decided")]
    BracketComplete,

    #[error("Match {match_id} is not completed")]
    RoundInProgress { match_id: String },

    #[error("Match {match_id} ended in a draw and has no winner")]
    UndecidedMatch { match_id: String },

    #[error("No match found at bracket position {position}")]
    MissingBracketMatch { position: u32 },

    #[error("Not enough free slots: {needed} needed, {available} available")]
    InsufficientSlots { needed: usize, available: usize },
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::TournamentNotFound => AppError::NotFound(err.to_string()),
            ScheduleError::InsufficientTeams { .. }
            | ScheduleError::NoFieldsConfigured
            | ScheduleError::InvalidScheduleConfig(_)
            | ScheduleError::InsufficientSlots { .. } => AppError::InvalidInput(err.to_string()),
            ScheduleError::AlreadyScheduled(_)
            | ScheduleError::BracketNotStarted
            | ScheduleError::BracketComplete
            | ScheduleError::RoundInProgress { .. }
            | ScheduleError::UndecidedMatch { .. }
            | ScheduleError::MissingBracketMatch { .. } => AppError::Conflict(err.to_string()),
        }
    }
}
