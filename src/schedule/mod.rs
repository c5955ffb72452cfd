// Public API - what other modules can use
pub use bracket::Bracket;
pub use errors::ScheduleError;
pub use handlers::{advance_bracket, generate_schedule};
pub use slots::ScheduleConfig;

// Internal modules
pub mod bracket;
mod errors;
mod handlers;
pub mod round_robin;
pub mod service;
pub mod slots;
pub mod types;
