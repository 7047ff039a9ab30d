//! HTTP server implementation
//!
//! Sets up the Axum HTTP server with:
//! - Amber routes
//! - Middleware (tracing, request metrics)
//! - Graceful shutdown

mod middleware;

use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::errors::Result;
use crate::metrics::Metrics;
use crate::routes;

/// HTTP server for Amber
pub struct Server {
    config: Config,
    metrics: Arc<Metrics>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config, metrics: Arc<Metrics>) -> Self {
        Self { config, metrics }
    }

    /// Build the Axum router with all middleware
    fn build_router(&self) -> Router {
        with_middleware(routes::create_router(self.metrics.clone()), self.metrics.clone())
    }

    /// Start the server and run until shutdown signal
    pub async fn start<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = self.build_router();
        let address = self.config.server.bind_address();

        let listener = tokio::net::TcpListener::bind(address).await?;
        info!(%address, "Server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

fn with_middleware(router: Router, metrics: Arc<Metrics>) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(axum::middleware::from_fn_with_state(
                metrics,
                middleware::track_requests,
            ))
            .into_inner(),
    )
}
