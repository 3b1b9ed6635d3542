//! tal-server: lead-intake REST server.
//!
//! Reads config from `~/.config/tal/` and env vars:
//!   TAL_BIND_ADDR - listen address (default: 0.0.0.0:3000)
//!   RUST_LOG      - log filter (default: info,tal_server=debug)

use anyhow::Context;
use tal_server::{AppState, build_router};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tal_server=debug".into()),
        )
        .init();

    let bind_addr = std::env::var("TAL_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let state = AppState::from_config()?;
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    tracing::info!("tal-server listening on {bind_addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
