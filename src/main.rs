//! Amber - tiny SRE-friendly demo service
//!
//! Serves liveness, informational and Prometheus metrics endpoints, plus an
//! endpoint that fails on purpose so alerting pipelines can be exercised.

mod api;
mod config;
mod errors;
mod metrics;
mod routes;
mod server;

use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::AmberError;
use crate::metrics::Metrics;
use crate::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment and optional config file
    let loaded = Config::from_env();

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(startup_log_level(&loaded)))
        .context("invalid log level")?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Failed to load configuration");
            return Err(e).context("failed to load configuration");
        }
    };

    info!(?config, "Starting Amber");

    let metrics = Arc::new(Metrics::new().context("failed to register metrics")?);
    let server = Server::new(config, metrics);

    let shutdown_signal = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal"),
            Err(e) => {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        }
    };

    if let Err(e) = server.start(shutdown_signal).await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Log level to install before the configuration is known to be valid
fn startup_log_level(loaded: &Result<Config, AmberError>) -> String {
    match loaded {
        Ok(config) => config.log_level.clone(),
        Err(_) => Config::default().log_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_log_level() {
        let config = Config {
            log_level: "debug".to_string(),
            ..Config::default()
        };
        assert_eq!(startup_log_level(&Ok(config)), "debug");

        let failed = Err(AmberError::Config("invalid PORT \"abc\"".to_string()));
        assert_eq!(startup_log_level(&failed), "info");
    }
}
