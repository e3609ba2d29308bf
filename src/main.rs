use std::sync::Arc;

use anyhow::Context;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod content_loader;
mod error;
mod hot_reload;
mod markdown;
mod models;
mod posts;
mod routes;
mod source;
mod state;
mod text;
mod views;

#[cfg(test)]
mod test_support;

use config::Config;
use content_loader::load_templates;
use source::ContentHost;
use state::{AppState, RouterState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("RUST_ENV is set to development: {}", config.is_development);

    let host = ContentHost::new(&config.source).context("Failed to set up content host")?;
    info!(index = %host.index_url(), "post index source");

    let templates = load_templates(&config.content_dir)
        .await
        .context("Failed to load initial content files")?;

    let addr = config.listen_addr();
    let is_development = config.is_development;
    let state = Arc::new(AppState::new(config, host, templates));

    // Hot-reload setup
    let (tx, _rx) = broadcast::channel(1);
    if is_development {
        info!("Hot reload enabled. Check logs for file change events.");
        hot_reload::start_content_watcher(tx.clone(), state.clone());
    }

    let app = routes::router(RouterState {
        app_state: state,
        broadcaster: tx,
    });

    info!(%addr, "listening");
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}
