use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use salvo::prelude::*;
use tracing::info;

use crate::config::Config;
use crate::db::DatabaseManager;

pub mod error;
pub mod handlers;
pub mod requests;
pub mod routes;

pub use self::routes::create_router;

/// Shared state handed to every handler through the depot.
#[derive(Clone)]
pub struct WebState {
    pub db_manager: Arc<DatabaseManager>,
    pub started_at: Instant,
}

impl WebState {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self {
            db_manager,
            started_at: Instant::now(),
        }
    }
}

#[derive(Clone)]
pub struct WebServer {
    config: Arc<Config>,
    state: WebState,
}

impl WebServer {
    pub fn new(config: Arc<Config>, db_manager: Arc<DatabaseManager>) -> Self {
        Self {
            config,
            state: WebState::new(db_manager),
        }
    }

    /// Serves until ctrl-c or SIGTERM, then drains in-flight requests.
    pub async fn start(&self) -> Result<()> {
        let bind_addr = self.config.server.bind_addr();
        info!("Starting web server on {}", bind_addr);

        let acceptor = TcpListener::new(bind_addr).try_bind().await?;
        let server = Server::new(acceptor);
        let handle = server.handle();

        tokio::spawn(async move {
            shutdown_signal().await;
            info!("shutdown signal received, draining connections");
            handle.stop_graceful(None);
        });

        server.serve(create_router(self.state.clone())).await;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
