use thiserror::Error;

use crate::shared::AppError;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("Statistics overflow: {0}")]
    Overflow(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<AppError> for StatsError {
    fn from(err: AppError) -> Self {
        StatsError::Repository(err.to_string())
    }
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::TeamNotFound(team_id) => {
                AppError::NotFound(format!("Team not found: {}", team_id))
            }
            StatsError::Overflow(msg) => AppError::InvalidInput(msg),
            StatsError::Repository(msg) => AppError::DatabaseError(msg),
        }
    }
}
