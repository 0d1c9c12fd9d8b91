//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the switch from configuration
//! - Create the Axum Router with the switch as its only service
//! - Wire up middleware (request ID, tracing, timeout)
//! - Apply route updates from the config watcher
//! - Serve until shutdown

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{ConfigError, RouterConfig};
use crate::handlers::build_switch;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::service::{SwitchHandle, SwitchService};

/// HTTP front end for a [`crate::routing::RegexSwitch`].
pub struct HttpServer {
    config: RouterConfig,
    switch: SwitchHandle,
}

impl HttpServer {
    /// Create a server for the given configuration.
    ///
    /// Fails if any configured route cannot be compiled.
    pub fn new(config: RouterConfig) -> Result<Self, ConfigError> {
        let switch = build_switch(&config.routes)?;
        let switch = SwitchHandle::new(switch);
        crate::observability::metrics::set_active_rules(switch.load().len());

        Ok(Self { config, switch })
    }

    /// Handle to the active switch.
    pub fn switch(&self) -> &SwitchHandle {
        &self.switch
    }

    /// Build the Axum router with all middleware layers.
    pub fn router(&self) -> Router {
        let service = SwitchService::new(self.switch.clone(), self.config.limits.max_body_bytes);

        Router::new()
            .fallback_service(service)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(self.config.limits.request_timeout_secs),
            ))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Route changes received on `config_updates` replace the active switch.
    /// Listener and limit settings only take effect on restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            "HTTP server starting"
        );

        let switch = self.switch.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                apply_routes(&switch, &config);
            }
        });

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Rebuild the switch from `config` and swap it in. Keeps the current switch
/// if the new routes do not compile.
pub fn apply_routes(switch: &SwitchHandle, config: &RouterConfig) {
    match build_switch(&config.routes) {
        Ok(new_switch) => {
            let rules = new_switch.len();
            switch.store(new_switch);
            tracing::info!(rules, "Routes reloaded");
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected route update, keeping current routes");
        }
    }
}
