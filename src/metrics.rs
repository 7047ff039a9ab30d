//! Prometheus metrics for Amber
//!
//! Defines metrics for:
//! - Request counts by method, endpoint and status
//! - Request latency by endpoint
//! - Error counts by endpoint and failure kind
//! - Liveness and uptime gauges
//!
//! All series live in a registry owned by [`Metrics`], which is built once at
//! startup and shared with the router as state.

use prometheus::{
    Encoder, Gauge, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::time::{Duration, Instant};

use crate::errors::Result;

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Latency buckets in seconds
const LATENCY_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Process-wide metrics registry
pub struct Metrics {
    registry: Registry,
    started: Instant,

    /// HTTP request counter by method, endpoint and status
    pub http_requests: IntCounterVec,

    /// Request latency histogram by endpoint
    pub request_latency: HistogramVec,

    /// Failure counter by endpoint and failure kind
    pub http_errors: IntCounterVec,

    /// 1 while the process is serving
    pub app_up: IntGauge,

    /// Seconds since the registry was created
    pub uptime: Gauge,
}

impl Metrics {
    /// Create all metrics and register them in a fresh registry
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("amber_http_requests_total", "Total HTTP requests"),
            &["method", "endpoint", "http_status"],
        )?;

        let request_latency = HistogramVec::new(
            HistogramOpts::new("amber_request_latency_seconds", "Request latency")
                .buckets(LATENCY_BUCKETS.to_vec()),
            &["endpoint"],
        )?;

        let http_errors = IntCounterVec::new(
            Opts::new("amber_http_errors_total", "Total HTTP errors"),
            &["endpoint", "exception_type"],
        )?;

        let app_up = IntGauge::new("amber_app_up", "1 if the app is up")?;
        let uptime = Gauge::new("amber_uptime_seconds", "App uptime in seconds")?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(request_latency.clone()))?;
        registry.register(Box::new(http_errors.clone()))?;
        registry.register(Box::new(app_up.clone()))?;
        registry.register(Box::new(uptime.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        app_up.set(1);

        Ok(Self {
            registry,
            started: Instant::now(),
            http_requests,
            request_latency,
            http_errors,
            app_up,
            uptime,
        })
    }

    /// Count one completed request and observe its latency
    pub fn record_request(&self, method: &str, endpoint: &str, status: u16, elapsed: Duration) {
        self.http_requests
            .with_label_values(&[method, endpoint, &status.to_string()])
            .inc();
        self.request_latency
            .with_label_values(&[endpoint])
            .observe(elapsed.as_secs_f64());
    }

    /// Count one failed request
    pub fn record_error(&self, endpoint: &str, kind: &str) {
        self.http_errors.with_label_values(&[endpoint, kind]).inc();
    }

    /// Set the uptime gauge from the monotonic clock
    pub fn refresh_uptime(&self) {
        self.uptime.set(self.started.elapsed().as_secs_f64());
    }

    /// Serialize every registered family in the text exposition format
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        // TextEncoder only ever writes UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_up_is_set() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.app_up.get(), 1);
        assert!(metrics.render().unwrap().contains("amber_app_up 1"));
    }

    #[test]
    fn test_record_request() {
        let metrics = Metrics::new().unwrap();
        for _ in 0..3 {
            metrics.record_request("GET", "/health", 200, Duration::from_millis(2));
        }
        metrics.record_request("GET", "/health", 500, Duration::from_millis(40));

        assert_eq!(
            metrics
                .http_requests
                .with_label_values(&["GET", "/health", "200"])
                .get(),
            3
        );
        assert_eq!(
            metrics
                .request_latency
                .with_label_values(&["/health"])
                .get_sample_count(),
            4
        );
        assert_eq!(
            metrics
                .http_requests
                .with_label_values(&["GET", "/health", "500"])
                .get(),
            1
        );
    }

    #[test]
    fn test_render_exposition() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("GET", "/readme", 200, Duration::from_millis(30));
        metrics.record_error("/error", "RuntimeError");

        let text = metrics.render().unwrap();
        assert!(text.contains("# HELP amber_http_requests_total Total HTTP requests"));
        assert!(text.contains("# TYPE amber_http_requests_total counter"));
        assert!(text.contains(
            r#"amber_http_requests_total{endpoint="/readme",http_status="200",method="GET"} 1"#
        ));
        assert!(text.contains("# TYPE amber_request_latency_seconds histogram"));
        assert!(text.contains(r#"amber_request_latency_seconds_bucket{endpoint="/readme",le="0.05"} 1"#));
        assert!(text.contains(r#"amber_request_latency_seconds_bucket{endpoint="/readme",le="0.025"} 0"#));
        assert!(text.contains(r#"amber_request_latency_seconds_count{endpoint="/readme"} 1"#));
        assert!(text.contains(
            r#"amber_http_errors_total{endpoint="/error",exception_type="RuntimeError"} 1"#
        ));
        assert!(text.contains("# TYPE amber_uptime_seconds gauge"));
    }

    #[test]
    fn test_uptime_is_monotonic() {
        let metrics = Metrics::new().unwrap();
        metrics.refresh_uptime();
        let first = metrics.uptime.get();
        std::thread::sleep(Duration::from_millis(5));
        metrics.refresh_uptime();
        let second = metrics.uptime.get();
        assert!(first >= 0.0);
        assert!(second >= first);
    }
}
