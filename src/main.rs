// src/main.rs

use forum::config::Config;
use forum::logging;
use forum::repository::{InMemoryForumRepository, PgForumRepository};
use forum::routes;
use forum::services::Forum;
use forum::state::AppState;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

const MAX_CONNECT_RETRIES: u32 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (.env included)
    let config = Config::from_env();

    // Initialize Tracing (Logging); the guard flushes the file writer on exit
    let _guard = logging::init(&config);

    let settings = config.forum_settings();
    let forum = match &config.database_url {
        Some(database_url) => {
            let pool = connect(database_url, config.max_connections).await?;

            // Run Migrations Automatically
            tracing::info!("Running migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Migrations applied successfully.");

            Forum::new(Arc::new(PgForumRepository::new(pool)), settings)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, comments are kept in memory only");
            Forum::new(Arc::new(InMemoryForumRepository::new()), settings)
        }
    };

    tracing::info!(
        atomic_reactions = settings.atomic_reactions,
        "Forum core ready"
    );

    let addr = config.bind_addr()?;
    let state = AppState { forum, config };

    let app = routes::create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize Database Pool with Retry
async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                tracing::info!("Database connected...");
                return Ok(pool);
            }
            Err(e) => {
                retry_count += 1;
                if retry_count > MAX_CONNECT_RETRIES {
                    tracing::error!(
                        "Failed to connect to database after {} retries: {}",
                        MAX_CONNECT_RETRIES,
                        e
                    );
                    return Err(e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}
