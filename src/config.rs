use tracing::{debug, warn};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 100;
const DEFAULT_TOKEN_EXPIRATION_DAYS: i64 = 30;

/// Process configuration read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Postgres connection string; in-memory repositories are used when absent
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_expiration_days: i64,
    pub event_channel_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_ok() {
            debug!("Loaded environment from .env");
        }

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, falling back to development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            database_url: std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret,
            token_expiration_days: parse_var("TOKEN_EXPIRATION_DAYS")
                .unwrap_or(DEFAULT_TOKEN_EXPIRATION_DAYS),
            event_channel_capacity: parse_var("EVENT_CHANNEL_CAPACITY")
                .unwrap_or(DEFAULT_EVENT_CHANNEL_CAPACITY),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_expiration_days: DEFAULT_TOKEN_EXPIRATION_DAYS,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring unparsable environment value");
            None
        }
    }
}
