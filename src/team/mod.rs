// Public API - what other modules can use
pub use handlers::{
    add_player, get_team, list_teams, lock_roster, register_team, set_team_status,
    verify_jerseys,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
