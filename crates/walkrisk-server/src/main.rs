//! Walk-risk server: trains the risk model at startup, then scores routes.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkrisk_core::RiskContext;
use walkrisk_server::{api, config::Config, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("walkrisk_server=debug".parse()?)
            .add_directive("walkrisk_core=info".parse()?))
        .init();

    tracing::info!("Starting walk-risk server...");

    let config = Config::from_env();
    let pipeline = config.pipeline_config()?;
    let data_path = config.data_path.clone();
    tracing::info!("Training risk model from {}", data_path.display());

    // Indexing and boosting are CPU-bound; keep them off the async workers.
    let context = tokio::task::spawn_blocking(move || RiskContext::from_csv_path(pipeline, &data_path))
        .await
        .context("model build task panicked")??;
    tracing::info!("Risk model ready: {:?}", context.summary());

    let port = config.server_port;
    let state = Arc::new(AppState::new(context, config));
    let app = api::app(state);

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
