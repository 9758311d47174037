//! Gateway Server
//!
//! HTTP server exposing the Everything demo capabilities over the direct
//! JSON-RPC endpoint and the SSE streaming transport. Owns the lifecycle
//! of every periodic task (keepalive pings, expiry sweep, resource-update
//! notifier, bus forwarder): started on serve, torn down on shutdown so no
//! timer outlives the process.

mod handlers;
mod state;

pub use handlers::CONNECTION_ID_HEADER;
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use everything_core::NotificationBus;
use everything_mcp::{EverythingServer, UpdateNotifier, RESOURCE_UPDATE_PERIOD};

use crate::notifier::BusForwarder;
use crate::stream::{ExpirySweeper, PingScheduler, SessionRegistry, DEFAULT_BUFFER_CAPACITY};

/// Gateway server configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS for browser access
    pub enable_cors: bool,
    /// Per-session frame buffer bound
    pub buffer_capacity: usize,
    /// Keepalive ping period
    pub ping_period: Duration,
    /// Idle time after which a detached session is swept
    pub session_ttl: Duration,
    /// Expiry sweep period
    pub sweep_period: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            enable_cors: true,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            ping_period: Duration::from_secs(10),
            session_ttl: Duration::from_secs(300),
            sweep_period: Duration::from_secs(60),
        }
    }
}

impl GatewayConfig {
    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid address")
    }
}

/// Handles to every periodic task the server owns. Shutting down twice is
/// safe; each handle cancels an independent token.
struct BackgroundTasks {
    pings: PingScheduler,
    sweeper: ExpirySweeper,
    updates: UpdateNotifier,
    forwarder: BusForwarder,
}

impl BackgroundTasks {
    fn shutdown(&self) {
        self.pings.shutdown();
        self.sweeper.shutdown();
        self.updates.shutdown();
        self.forwarder.shutdown();
    }
}

/// Everything Gateway Server
///
/// Self-contained: builds its own capability server, session registry, and
/// notification bus. `run` serves until ctrl-c; `serve` takes an explicit
/// listener and shutdown future (used by tests to bind port 0).
pub struct GatewayServer {
    config: GatewayConfig,
    state: AppState,
    bus: NotificationBus,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig) -> Self {
        let bus = NotificationBus::new();
        let mcp = Arc::new(EverythingServer::new(bus.sender()));
        let registry = Arc::new(SessionRegistry::new(config.buffer_capacity));
        let state = AppState::new(registry, mcp);

        info!(
            "[Gateway] Initialized (buffer capacity {}, ping every {:?}, session TTL {:?})",
            config.buffer_capacity, config.ping_period, config.session_ttl
        );

        Self { config, state, bus }
    }

    /// Shared state (for tests and embedders).
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the Axum router
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .route("/sse", get(handlers::sse_stream))
            .route("/message", post(handlers::post_message))
            .route("/mcp", post(handlers::mcp_dispatch))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router
    }

    fn start_background_tasks(&self) -> BackgroundTasks {
        BackgroundTasks {
            pings: PingScheduler::start(self.state.registry.clone(), self.config.ping_period),
            sweeper: ExpirySweeper::start(
                self.state.registry.clone(),
                self.config.session_ttl,
                self.config.sweep_period,
            ),
            updates: self.state.mcp.start_update_notifier(RESOURCE_UPDATE_PERIOD),
            forwarder: BusForwarder::start(self.state.registry.clone(), self.bus.subscribe()),
        }
    }

    /// Run the gateway server on the configured address until ctrl-c.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.addr();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("[Gateway] Listening on {}", addr);

        self.serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("[Gateway] Shutdown signal received");
        })
        .await
    }

    /// Serve on an existing listener until `shutdown` resolves, then tear
    /// down every background task.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        info!(
            "[Gateway] CORS: {}",
            if self.config.enable_cors {
                "enabled"
            } else {
                "disabled"
            }
        );

        let tasks = self.start_background_tasks();
        let router = self.build_router();

        info!("[Gateway] Ready to accept connections");
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await;

        tasks.shutdown();
        info!("[Gateway] Background tasks stopped");
        result?;
        Ok(())
    }
}
