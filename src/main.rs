//! Ferret-RS: a pluggable search host
//!
//! This is the main entry point for the application.

use anyhow::Result;
use ferret_rs::{
    config,
    network::HttpClient,
    providers::ProviderLoader,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let debug = std::env::var("FERRET_DEBUG")
        .map(|v| v.parse().unwrap_or(false))
        .unwrap_or(false);

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Ferret-RS v{}", ferret_rs::VERSION);

    // Load configuration
    let settings = config::load()?;

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Load providers
    let registry = ProviderLoader::load(&settings, &client);
    if registry.is_empty() {
        info!("No providers available; set FERRET_CONSUL_URL to enable consul");
    }

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    let state = AppState::new(&settings, registry)?;
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
