//! Logging and Metrics Setup

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
    #[error("Failed to install metrics recorder: {0}")]
    Metrics(String),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: &str, json: bool) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| TelemetryError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| TelemetryError::Logging(e.to_string()))
}

/// Install the global Prometheus recorder and describe the service metrics
pub fn install_metrics() -> Result<PrometheusHandle, TelemetryError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;

    metrics::describe_counter!("titanic_predictions_total", "Predictions served, by outcome");
    metrics::describe_counter!("titanic_training_runs_total", "Training attempts, by status");
    metrics::describe_histogram!(
        "titanic_training_duration_seconds",
        metrics::Unit::Seconds,
        "Wall time of training attempts"
    );
    Ok(handle)
}
