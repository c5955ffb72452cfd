use pitchside::{router, AppConfig, AppState, EventBus, Repositories, TokenConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pitchside=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(AppConfig::from_env()).await {
        error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting pitchside tournament server");

    let repositories = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Connected to PostgreSQL");
            Repositories::postgres(pool)
        }
        None => {
            info!("DATABASE_URL not set, using in-memory storage");
            Repositories::in_memory()
        }
    };

    let app_state = AppState::new(
        repositories,
        TokenConfig::new(config.jwt_secret.clone(), config.token_expiration_days),
        EventBus::new(config.event_channel_capacity),
    );
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
