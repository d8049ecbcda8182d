//! Main webserver implementation
//!
//! Owns the process state and the injected services, builds the router and
//! serves it until a shutdown message arrives.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use shared::{ProcessId, logging, process_info};
use tokio::sync::mpsc;

use crate::error::{WebServerError, WebServerResult};
use crate::services::AppServices;
use crate::state::WebServerState;
use crate::web::{ApiState, build_router};

/// Main webserver struct with dependency injection
pub struct WebServer {
    state: Arc<WebServerState>,
    services: AppServices,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: Option<mpsc::Receiver<()>>,
}

impl WebServer {
    pub fn new(bind_address: SocketAddr, services: AppServices) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        Self {
            state: Arc::new(WebServerState::new(bind_address)),
            services,
            shutdown_tx,
            shutdown_rx: Some(shutdown_rx),
        }
    }

    /// Sender that stops `run` gracefully
    pub fn get_shutdown_sender(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    pub fn router(&self) -> Router {
        build_router(ApiState {
            services: self.services.clone(),
            server: Arc::clone(&self.state),
        })
    }

    /// Serve HTTP until a shutdown message arrives
    pub async fn run(&mut self) -> WebServerResult<()> {
        let mut shutdown_rx = self
            .shutdown_rx
            .take()
            .ok_or_else(|| WebServerError::ServerStartup("server already started".to_string()))?;

        let address = self.state.bind_address;
        let listener = tokio::net::TcpListener::bind(address)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Failed to bind to {address}: {e}")))?;
        let local = listener.local_addr()?;

        logging::log_startup(ProcessId::current(), &format!("HTTP API on http://{local}"));

        let state = Arc::clone(&self.state);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                state.set_running(false);
                process_info!(ProcessId::current(), "🛑 Shutdown requested, draining connections");
            })
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Server error: {e}")))?;

        Ok(())
    }

    /// Get server state for external access
    pub fn state(&self) -> &Arc<WebServerState> {
        &self.state
    }
}
