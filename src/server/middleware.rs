//! Request instrumentation middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::FailureKind;
use crate::metrics::Metrics;
use crate::routes::Endpoint;

/// Time and count every request except metrics scrapes
///
/// Failed requests are counted twice: once in the error counter and once in
/// the request counter with their 500 status.
pub async fn track_requests(
    State(metrics): State<Arc<Metrics>>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;

    let endpoint = response.extensions().get::<Endpoint>().copied();
    let label = Endpoint::label(endpoint);

    if let Some(FailureKind(kind)) = response.extensions().get::<FailureKind>() {
        metrics.record_error(&label, kind);
    }

    metrics.refresh_uptime();

    if endpoint != Some(Endpoint::Metrics) {
        metrics.record_request(
            method.as_str(),
            &label,
            response.status().as_u16(),
            started.elapsed(),
        );
    }

    response
}
