mod config;
mod errors;
mod generation;
mod llm_client;
mod pipeline;
mod routes;
mod state;
#[cfg(test)]
mod test_support;
mod trace;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::pipeline::schema::SchemaRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cadence API v{}", env!("CARGO_PKG_VERSION"));

    // Compile response schemas once, shared read-only by every handler
    let schemas = Arc::new(SchemaRegistry::compile()?);
    info!("Response schemas compiled");

    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.anthropic_model.clone())?;
    info!("LLM client initialized (model: {})", llm.model());

    info!(
        "Normalizer: tolerance {}h, minimum block {}h",
        config.normalizer.tolerance, config.normalizer.min_block_hours
    );
    let state = AppState::new(Arc::new(llm), schemas, config.normalizer);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
