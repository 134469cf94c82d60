//! Bee auth proxy — relays browser logins to the Bee authentication service.
//!
//! The browser never sees the application credentials. On each
//! `POST /proxy/bee-auth` the proxy:
//!
//! 1. Reads the optional `uid` from the request body.
//! 2. Posts `{client_id, client_secret, uid}` to the Bee `loginV2` endpoint.
//! 3. Returns the upstream JSON untouched, or a generic 500 on any failure.
//!
//! It also answers `GET /proxy/health` and serves the front-end's static files.

mod app;
mod bee;
mod config;
mod error;
mod panic_hook;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use crate::app::AppState;
use crate::config::AppConfig;

/// Bee authentication relay.
#[derive(Parser, Debug)]
#[command(name = "bee-auth-proxy", about = "Relay browser logins to the Bee auth service")]
struct Args {
    /// Port to listen on (overrides `PROXY_PORT`).
    #[arg(long)]
    port: Option<u16>,

    /// Directory to serve static files from (overrides `STATIC_DIR`).
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    panic_hook::install();

    let args = Args::parse();

    // A missing .env is fine; the variables may come from the real environment.
    if let Ok(path) = dotenvy::dotenv() {
        info!(path = %path.display(), "loaded environment file");
    }

    // Configuration
    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.listen_port = port;
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = dir;
    }

    info!(
        upstream = %config.upstream_url,
        timeout_secs = config.upstream_timeout.as_secs(),
        client_id_set = config.credentials.client_id().is_some(),
        client_secret_set = config.credentials.client_secret().is_some(),
        static_dir = %config.static_dir.display(),
        "configuration loaded"
    );
    if !config.credentials.is_complete() {
        warn!("BEE_CLIENT_ID / BEE_CLIENT_SECRET not fully set; upstream logins will likely fail");
    }

    let listen_port = config.listen_port;
    let state = Arc::new(AppState::new(config).context("failed to build HTTP client")?);
    let router = app::router(state);

    let addr = format!("0.0.0.0:{listen_port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(url = %format!("http://localhost:{listen_port}"), "proxy server running");
    axum::serve(listener, router).await.context("server error")?;

    Ok(())
}
