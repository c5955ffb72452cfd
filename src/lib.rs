// Library crate for the pitchside tournament server
// This file exposes the public API for integration tests

pub mod app;
pub mod auth;
pub mod config;
pub mod event;
pub mod live;
pub mod locks;
pub mod matches;
pub mod player;
pub mod schedule;
pub mod shared;
pub mod spirit;
pub mod stats;
pub mod team;
pub mod tournament;

// Re-export commonly used types for easier access in tests
pub use app::router;
pub use auth::{Caller, Role, TokenConfig};
pub use config::AppConfig;
pub use event::{EventBus, TournamentEvent};
pub use shared::{AppError, AppState, Repositories};
