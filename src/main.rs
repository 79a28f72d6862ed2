use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod controllers;
mod errors;
mod middleware;
mod models;
mod routes;
mod store;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = config::Config::from_env()?;
    let store = store::Store::new(&config.notes_file);
    // The notes file is never created for you; refuse to start without it.
    let count = store.check().await.with_context(|| {
        format!(
            "{} must exist and contain a JSON array (at least `[]`)",
            config.notes_file.display()
        )
    })?;
    info!(
        path = %config.notes_file.display(),
        count,
        "loaded notes file"
    );

    let state = models::AppState {
        store: Arc::new(store),
    };
    let app = routes::app(state);

    let server = axum::Server::try_bind(&config.addr)
        .with_context(|| format!("cannot listen on {}", config.addr))?;
    info!("listening on {}", config.addr);
    server
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

/// Resolves on Ctrl-C. In-flight requests (and their file writes) finish
/// before the server returns.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("cannot listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}
