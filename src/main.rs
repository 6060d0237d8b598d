// SPDX-License-Identifier: MIT

//! ZenGym API Server
//!
//! Backend for the ZenGym fitness app: workout sessions and routines,
//! streak/weekly stats, daily affirmations, and the quota-gated AI
//! assistant.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zengym::{
    config::Config,
    services::{ActivityAggregator, OidcClient, ZenAssistant},
    storage::{MemoryStorage, SqliteStorage, Storage},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting ZenGym API");

    // Select the storage backend
    let storage: Arc<dyn Storage> = match &config.database_url {
        Some(url) => {
            let db = SqliteStorage::new(url)
                .await
                .expect("Failed to open database");
            db.migrate().await.expect("Failed to run migrations");
            tracing::info!(url = %url, "Using SQLite storage");
            Arc::new(db)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (data is not persisted)");
            Arc::new(MemoryStorage::new())
        }
    };

    let aggregator = ActivityAggregator::new(storage.clone());

    let assistant =
        ZenAssistant::new(config.openai_api_key.clone()).expect("Failed to build HTTP client");
    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set, assistant will use fallback responses only");
    }

    let oidc = OidcClient::new(&config);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        aggregator,
        assistant,
        oidc,
    });

    // Build router
    let app = zengym::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("zengym=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
