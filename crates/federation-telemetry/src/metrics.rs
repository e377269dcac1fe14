//! Prometheus metrics for remote container loading.
//!
//! All metrics follow the naming convention: `mf_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // REMOTE LOAD METRICS
    // =========================================================================

    /// Load attempts started
    pub static ref REMOTE_LOADS_STARTED: Counter = Counter::new(
        "mf_remote_loads_started_total",
        "Total remote container load attempts started"
    ).expect("metric creation failed");

    /// Load attempts that produced a container
    pub static ref REMOTE_LOADS_COMPLETED: Counter = Counter::new(
        "mf_remote_loads_completed_total",
        "Total remote container load attempts that completed"
    ).expect("metric creation failed");

    /// Load attempts that failed
    pub static ref REMOTE_LOADS_FAILED: CounterVec = CounterVec::new(
        Opts::new("mf_remote_loads_failed_total", "Failed remote container loads"),
        &["reason"]  // reason: empty_container/transport
    ).expect("metric creation failed");

    /// Load attempt duration
    pub static ref REMOTE_LOAD_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "mf_remote_load_duration_seconds",
            "Time spent loading a remote container"
        ).buckets(exponential_buckets(0.001, 2.0, 15).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // SIDE CONFIG / MODULE METRICS
    // =========================================================================

    /// Side config fetches that were downgraded to "no config"
    pub static ref SIDE_CONFIG_FAILURES: Counter = Counter::new(
        "mf_side_config_failures_total",
        "Total side config fetch or parse failures"
    ).expect("metric creation failed");

    /// Module lookups by outcome
    pub static ref MODULE_LOOKUPS: CounterVec = CounterVec::new(
        Opts::new("mf_module_lookups_total", "Module lookups by outcome"),
        &["result"]  // result: found/missing
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(REMOTE_LOADS_STARTED.clone()),
        Box::new(REMOTE_LOADS_COMPLETED.clone()),
        Box::new(REMOTE_LOADS_FAILED.clone()),
        Box::new(REMOTE_LOAD_DURATION.clone()),
        Box::new(SIDE_CONFIG_FAILURES.clone()),
        Box::new(MODULE_LOOKUPS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics() {
        // May fail if already registered by another test, which is fine
        let _ = register_metrics();
    }

    #[test]
    fn test_counter_increment() {
        REMOTE_LOADS_STARTED.inc();
        assert!(REMOTE_LOADS_STARTED.get() >= 1.0);
    }

    #[test]
    fn test_labelled_counter() {
        MODULE_LOOKUPS.with_label_values(&["missing"]).inc();
        assert!(MODULE_LOOKUPS.with_label_values(&["missing"]).get() >= 1.0);
    }

    #[test]
    fn test_encode_after_register() {
        let _ = register_metrics();
        SIDE_CONFIG_FAILURES.inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("mf_side_config_failures_total"));
    }

    #[test]
    fn test_histogram_timer() {
        let _timer = HistogramTimer::new(&REMOTE_LOAD_DURATION);
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}
