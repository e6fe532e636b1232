//! Logger initialization.
//!
//! Pretty or JSON output through `tracing-subscriber`. `RUST_LOG` takes
//! precedence over the configured level. Also installs the optional Prometheus
//! exporter, since both are process-wide observability sinks.

mod config;

use std::net::SocketAddr;

pub(crate) use config::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub(crate) fn initialize(logger_config: &LoggerConfig, telemetry_config: &TelemetryConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logger_config.level));
    let registry = tracing_subscriber::registry().with(filter);

    // The iteration span carries the request cursor, so JSON lines keep it.
    match logger_config.format {
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init(),
    }

    initialize_metrics(&telemetry_config.metrics);
}

fn initialize_metrics(metrics_config: &TelemetryMetricsConfig) {
    let Some(bind_address) = metrics_bind_address(metrics_config) else {
        return;
    };

    match PrometheusBuilder::new()
        .with_http_listener(bind_address)
        .install()
    {
        Ok(()) => tracing::info!(
            bind_address = %bind_address,
            "Prometheus metrics exporter enabled"
        ),
        Err(error) => tracing::warn!(
            bind_address = %bind_address,
            error = %error,
            "Failed to initialize Prometheus metrics exporter"
        ),
    }
}

/// Scrape address to listen on, or `None` when the exporter stays off.
fn metrics_bind_address(metrics_config: &TelemetryMetricsConfig) -> Option<SocketAddr> {
    if !metrics_config.enabled {
        return None;
    }

    match metrics_config.bind_address.parse() {
        Ok(address) => Some(address),
        Err(error) => {
            tracing::warn!(
                bind_address = %metrics_config.bind_address,
                error = %error,
                "Invalid metrics bind address; metrics exporter disabled"
            );
            None
        }
    }
}
