//! API server
//!
//! Binds the router with its middleware stack and serves until a
//! shutdown signal arrives.

use super::{
    handlers::AppState,
    middleware::{create_cors_layer, request_id_middleware},
    routes::create_router,
};
use crate::config::ServerConfig;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

pub struct ApiServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Serve until ctrl-c or SIGTERM
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.build_app();
        let addr = SocketAddr::from((
            self.config.host.parse::<std::net::IpAddr>()?,
            self.config.port,
        ));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("stakehouse API listening on http://{}", addr);
        self.log_endpoints();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped gracefully");
        Ok(())
    }

    fn build_app(&self) -> axum::Router {
        create_router(self.state.clone())
            .layer(axum::middleware::from_fn(request_id_middleware))
            .layer(create_cors_layer(&self.config.allowed_origins))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    fn log_endpoints(&self) {
        info!("available endpoints:");
        info!("  POST /user/register   - create user + auth token");
        info!("  GET  /user/me         - current user and balance");
        info!("  POST /game/start      - open a game session");
        info!("  POST /game/bet        - place a bet");
        info!("  GET  /game/history    - session history, newest first");
        info!("  GET  /game/:gameId    - one session");
        info!("  GET  /health          - health check");
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C signal");
        },
        _ = terminate => {
            info!("received terminate signal");
        },
    }
}
