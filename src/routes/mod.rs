//! HTTP routes for the Amber service
//!
//! - GET /        - service metadata
//! - GET /health  - liveness
//! - GET /readme  - service description
//! - GET /error   - deliberate failure
//! - GET /metrics - Prometheus exposition

mod handlers;

use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::AmberError;
use crate::metrics::Metrics;

/// Logical endpoint resolved by the router, used as a metric label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Index,
    Health,
    Readme,
    Error,
    Metrics,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Index,
        Endpoint::Health,
        Endpoint::Readme,
        Endpoint::Error,
        Endpoint::Metrics,
    ];

    /// Route path the endpoint is mounted on
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Index => "/",
            Endpoint::Health => "/health",
            Endpoint::Readme => "/readme",
            Endpoint::Error => "/error",
            Endpoint::Metrics => "/metrics",
        }
    }

    /// Logical name used in metric labels
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Index => "index",
            Endpoint::Health => "health",
            Endpoint::Readme => "readme",
            Endpoint::Error => "error",
            Endpoint::Metrics => "metrics",
        }
    }

    /// Endpoint mounted on an exact route path
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|endpoint| endpoint.path() == path)
    }

    /// Metric label for a resolved endpoint, `/unknown` when nothing matched
    pub fn label(endpoint: Option<Self>) -> String {
        format!("/{}", endpoint.map_or("unknown", Endpoint::name))
    }
}

/// Create the Amber router
pub fn create_router(metrics: Arc<Metrics>) -> Router {
    instrument_routes(api_routes()).with_state(metrics)
}

fn api_routes() -> Router<Arc<Metrics>> {
    Router::new()
        .route(Endpoint::Index.path(), get(handlers::index))
        .route(Endpoint::Health.path(), get(handlers::health))
        .route(Endpoint::Readme.path(), get(handlers::readme))
        .route(Endpoint::Error.path(), get(handlers::error))
        .route(Endpoint::Metrics.path(), get(handlers::metrics))
}

/// Wrap every route added so far with panic recovery and endpoint tagging
fn instrument_routes(router: Router<Arc<Metrics>>) -> Router<Arc<Metrics>> {
    router
        .route_layer(CatchPanicLayer::custom(handle_panic))
        .route_layer(middleware::from_fn(tag_endpoint))
}

/// Record the matched endpoint on the response so outer layers can label it
///
/// A 405 from the method router means no handler was resolved, so the
/// response stays untagged and is counted as `/unknown`.
async fn tag_endpoint(path: MatchedPath, request: Request, next: Next) -> Response {
    let endpoint = Endpoint::from_path(path.as_str());
    let mut response = next.run(request).await;
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    if let Some(endpoint) = endpoint {
        response.extensions_mut().insert(endpoint);
    }
    response
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    AmberError::Panic(message).into_response()
}

/// Router with extra routes instrumented like the real ones
#[cfg(test)]
pub(crate) fn create_router_with(metrics: Arc<Metrics>, extra: Router<Arc<Metrics>>) -> Router {
    instrument_routes(api_routes().merge(extra)).with_state(metrics)
}
