use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use precis_core::ExtractService;
use precis_server::config::ServerConfig;
use precis_server::routes;
use precis_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("precis=info".parse()?))
        .with_target(false)
        .init();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    let client = &config.client;

    let anthropic = client.anthropic()?;
    let openai = client.openai()?;
    if !anthropic.is_configured() {
        tracing::warn!("ANTHROPIC_API_KEY is not set; anthropic requests will fail");
    }
    if !openai.is_configured() {
        tracing::warn!("OPENAI_API_KEY is not set; openai requests will fail");
    }
    if client.allow_private_urls {
        tracing::warn!("SSRF protection disabled: private and loopback targets are allowed");
    }

    let service = ExtractService::new(client.fetcher()?, anthropic, openai);
    let state = Arc::new(AppState::new(service));

    let app = routes::router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            // Oversized bodies surface as a JSON rejection, answered with the error envelope.
            .layer(DefaultBodyLimit::max(config.max_body_bytes)),
    );

    let addr = config.bind_addr();
    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    tracing::info!("Shutdown signal received");
}
