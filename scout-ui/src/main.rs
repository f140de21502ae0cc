//! scout-ui - PrintScout web service
//!
//! Serves the kid-facing search page and the parent-facing print queue on
//! a single local port. All state lives in one SQLite file; the two
//! upstream services are called once per user action.

use anyhow::Result;
use scout_common::config::ModuleConfig;
use scout_ui::services::{GeminiClient, GoogleSearchClient};
use scout_ui::{build_router, AppState};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting PrintScout UI (scout-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = ModuleConfig::load();
    if config.credentials.is_placeholder() {
        warn!("API keys not fully configured; upstream calls will fail until real keys are set");
    }

    let pool = scout_common::db::init_database(&config.database_path).await?;

    let search = GoogleSearchClient::new(
        config.credentials.google_api_key.clone(),
        config.credentials.search_engine_id.clone(),
    )?;
    let refiner = GeminiClient::new(config.credentials.gemini_api_key.clone())?;

    let state = AppState::new(
        pool,
        Arc::new(search),
        Arc::new(refiner),
        config.credentials.is_placeholder(),
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("scout-ui listening on http://127.0.0.1:{}", config.port);
    info!("Health check: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
