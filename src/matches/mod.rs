// Public API - what other modules can use
pub use handlers::{
    add_scoring_event, create_match, get_match, list_matches, update_match, update_score,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
