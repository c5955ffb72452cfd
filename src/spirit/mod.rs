// Public API - what other modules can use
pub use handlers::{match_spirit_scores, submit_spirit_score, team_spirit_scores};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
