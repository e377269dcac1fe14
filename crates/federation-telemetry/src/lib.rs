//! # Federation Telemetry
//!
//! Logging and metrics for the federation runtime.
//!
//! ## Components
//!
//! - **Logs**: `tracing` subscriber, pretty for development, JSON in containers
//! - **Metrics**: Prometheus counters for remote load lifecycle
//!
//! ## Usage
//!
//! ```rust,ignore
//! use federation_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MF_SERVICE_NAME` | `module-federation` | Service name in logs |
//! | `MF_LOG_LEVEL` | `info` | Log level filter |
//! | `MF_JSON_LOGS` | `false` | JSON formatted logs |
//! | `MF_CONSOLE_OUTPUT` | `true` | Emit logs to stdout |

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, MODULE_LOOKUPS, REMOTE_LOADS_COMPLETED,
    REMOTE_LOADS_FAILED, REMOTE_LOADS_STARTED, REMOTE_LOAD_DURATION, SIDE_CONFIG_FAILURES,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics_handle = register_metrics()?;
    init_tracing(&config)?;

    Ok(TelemetryGuard {
        _metrics: metrics_handle,
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
