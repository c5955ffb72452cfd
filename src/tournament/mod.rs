// Public API - what other modules can use
pub use handlers::{
    add_announcement, add_field, create_tournament, delete_tournament, get_standings,
    get_tournament, list_tournaments, update_tournament,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
