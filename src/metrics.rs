/// Metrics and telemetry for the PR mock
///
/// Provides Prometheus-compatible metrics for monitoring:
/// - Per-operation call counts and latencies
/// - Stored persons and identities
/// - Uptime

use lazy_static::lazy_static;
use prometheus::{
    register_gauge, register_histogram_vec, register_int_counter_vec, register_int_gauge, Encoder,
    Gauge, HistogramVec, IntCounterVec, IntGauge, TextEncoder,
};
use std::time::Instant;

lazy_static! {
    static ref STARTED_AT: Instant = Instant::now();

    // ========== Operation Metrics ==========

    /// Registry operations by operation name and HTTP status
    pub static ref OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "pr_operations_total",
        "Total number of registry operations",
        &["operation", "status"]
    )
    .unwrap();

    /// Registry operation duration in seconds
    pub static ref OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "pr_operation_duration_seconds",
        "Registry operation latencies in seconds",
        &["operation"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .unwrap();

    // ========== Registry Metrics ==========

    /// Stored persons
    pub static ref PERSONS_TOTAL: IntGauge = register_int_gauge!(
        "pr_persons_total",
        "Number of persons in the registry"
    )
    .unwrap();

    /// Stored identities across all persons
    pub static ref IDENTITIES_TOTAL: IntGauge = register_int_gauge!(
        "pr_identities_total",
        "Number of identities in the registry"
    )
    .unwrap();

    // ========== System Metrics ==========

    /// Application uptime in seconds
    pub static ref UPTIME_SECONDS: Gauge = register_gauge!(
        "uptime_seconds",
        "Application uptime in seconds"
    )
    .unwrap();
}

/// Start the uptime clock
pub fn init() {
    lazy_static::initialize(&STARTED_AT);
}

/// Seconds since [`init`]
pub fn uptime_seconds() -> f64 {
    STARTED_AT.elapsed().as_secs_f64()
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> String {
    UPTIME_SECONDS.set(uptime_seconds());

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Record a completed registry operation
pub fn record_operation(operation: &str, status: u16, duration: f64) {
    OPERATIONS_TOTAL
        .with_label_values(&[operation, &status.to_string()])
        .inc();
    OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration);
}

/// Update the registry size gauges
pub fn record_registry_size(persons: usize, identities: usize) {
    PERSONS_TOTAL.set(persons as i64);
    IDENTITIES_TOTAL.set(identities as i64);
}
