pub mod service;
pub mod standings;

mod errors;
pub mod models;

pub use errors::StatsError;
pub use models::{MatchOutcome, StatsState};
pub use service::{StatsChange, StatsService, StatsSync};
