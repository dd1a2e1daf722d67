use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use recipe_finder_api::{
    config::Config,
    routes::{create_router, AppState},
};

const DEFAULT_LOG_FILTER: &str = "recipe_finder_api=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;

    if !config.has_gemini_key() {
        tracing::warn!("GEMINI_API_KEY not set, recipes will be ranked locally");
    }

    let http_client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let bind_address = config.bind_address();
    let state = Arc::new(AppState::from_config(http_client, config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!(address = %bind_address, "Server listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
