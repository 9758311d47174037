//! Everything demo server binary.
//!
//! Serves the demo capability set over both transports:
//! - `POST /mcp` for direct JSON-RPC request/response
//! - `GET /sse` + `POST /message` for the streaming transport

use std::time::Duration;

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use everything_gateway::{GatewayConfig, GatewayServer};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=warn"));

    let console_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

fn config_from_env() -> GatewayConfig {
    let mut config = GatewayConfig::default();

    if let Ok(host) = std::env::var("EVERYTHING_HOST") {
        config.host = host;
    }
    if let Some(port) = std::env::var("EVERYTHING_PORT")
        .ok()
        .and_then(|value| value.parse().ok())
    {
        config.port = port;
    }
    if let Some(ttl) = std::env::var("EVERYTHING_SESSION_TTL_SECS")
        .ok()
        .and_then(|value| value.parse().ok())
    {
        config.session_ttl = Duration::from_secs(ttl);
    }

    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = config_from_env();
    info!(
        "[Server] Starting everything-server v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.host,
        config.port
    );

    GatewayServer::new(config).run().await
}
