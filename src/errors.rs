//! Error types for Amber
//!
//! Every failure, whether returned by a handler or caught as a panic, is
//! turned into the same JSON envelope with status 500. The response carries
//! a [`FailureKind`] extension so the request instrumentation can count it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Main error type for Amber
#[derive(Error, Debug)]
pub enum AmberError {
    /// Generic runtime failure raised by a handler
    #[error("{0}")]
    Runtime(String),

    /// Metrics registration or encoding failed
    #[error("{0}")]
    Metrics(#[from] prometheus::Error),

    /// A handler panicked
    #[error("{0}")]
    Panic(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AmberError {
    /// Name of the failure class, recorded as the `exception_type` label
    pub fn kind(&self) -> &'static str {
        match self {
            AmberError::Runtime(_) => "RuntimeError",
            AmberError::Metrics(_) => "MetricsError",
            AmberError::Panic(_) => "Panic",
            AmberError::Config(_) => "ConfigError",
            AmberError::Io(_) => "IoError",
        }
    }
}

/// Marker left in the response extensions of every failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureKind(pub &'static str);

/// JSON error envelope
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AmberError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        // Message goes out verbatim, internal detail included.
        let message = self.to_string();
        error!(kind, error = %message, "Request failed");

        let mut response = (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { error: message }),
        )
            .into_response();
        response.extensions_mut().insert(FailureKind(kind));
        response
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AmberError>;
