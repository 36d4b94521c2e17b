//! yomu catalog proxy.
//!
//! Run: `cargo run --bin yomu-proxy -- --port 3001`

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use yomu_core::config::AppConfig;
use yomu_proxy::{router, ProxyState};

/// Port override read when `--port` is not given.
const PORT_ENV: &str = "YOMU_PROXY_PORT";

#[derive(Debug, Parser)]
#[command(name = "yomu-proxy", version, about = "Catalog search passthrough for browser clients")]
struct Args {
    /// Port to listen on (falls back to $YOMU_PROXY_PORT, then the config file).
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind.
    #[arg(long)]
    bind: Option<String>,

    /// Config file to use instead of the per-user one.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn env_port() -> Option<u16> {
    let raw = std::env::var(PORT_ENV).ok()?;
    match raw.parse() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!(value = %raw, "ignoring invalid {PORT_ENV}");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,yomu=debug")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .unwrap_or_else(|e| {
        tracing::error!("failed to load config: {e}");
        std::process::exit(1);
    });

    let bind = args.bind.unwrap_or_else(|| config.proxy.bind.clone());
    let port = args.port.or_else(env_port).unwrap_or(config.proxy.port);
    let addr = format!("{bind}:{port}");

    tracing::info!(upstream = %config.api.base_url, "yomu proxy initialized");
    let app = router(Arc::new(ProxyState::new(config)));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("yomu proxy listening on http://{addr}");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
