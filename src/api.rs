//! JSON response bodies for the informational endpoints

use serde::Serialize;

/// Service metadata returned by `GET /`
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub app: &'static str,
    pub message: &'static str,
    pub docs: &'static str,
    pub health: &'static str,
    pub metrics: &'static str,
}

impl ServiceInfo {
    pub fn amber() -> Self {
        Self {
            app: "Amber",
            message: "Hello from Amber 💎",
            docs: "/readme",
            health: "/health",
            metrics: "/metrics",
        }
    }
}

/// Liveness body returned by `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Description returned by `GET /readme`
#[derive(Debug, Serialize)]
pub struct Readme {
    pub about: &'static str,
    pub endpoints: &'static [&'static str],
    pub metrics_prefix: &'static str,
}

impl Readme {
    pub fn amber() -> Self {
        Self {
            about: "Amber is a tiny SRE-friendly demo app for learning monitoring, alerting, and reliability practices.",
            endpoints: &["/", "/health", "/metrics"],
            metrics_prefix: "amber_* (Prometheus format)",
        }
    }
}
