//! Prometheus metrics for Social-Mesh.
//!
//! All metrics follow the naming convention: `sm_<area>_<metric>_<unit>`
//!
//! Query-bus counters are mirrored from [`QueryStatsSnapshot`]s rather than
//! incremented inline, so the bus itself stays free of any metrics dependency.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder,
};
use shared_bus::QueryStatsSnapshot;
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // QUERY BUS METRICS
    // =========================================================================

    /// Queries issued by clients
    pub static ref QUERIES_ISSUED: IntCounterVec = IntCounterVec::new(
        Opts::new("sm_query_issued_total", "Queries registered by clients"),
        &["kind"]
    ).expect("metric creation failed");

    /// Queries answered before their deadline
    pub static ref QUERIES_COMPLETED: IntCounterVec = IntCounterVec::new(
        Opts::new("sm_query_completed_total", "Responses delivered to a waiting client"),
        &["kind"]
    ).expect("metric creation failed");

    /// Client waits that hit the deadline
    pub static ref QUERY_TIMEOUTS: IntCounterVec = IntCounterVec::new(
        Opts::new("sm_query_timeouts_total", "Client waits that timed out"),
        &["kind"]
    ).expect("metric creation failed");

    /// Fallback values handed to callers
    pub static ref QUERY_FALLBACKS: IntCounterVec = IntCounterVec::new(
        Opts::new("sm_query_fallbacks_total", "Fallback values returned to callers"),
        &["kind"]
    ).expect("metric creation failed");

    /// Responses that found no waiter
    pub static ref QUERY_LATE_RESPONSES: IntCounterVec = IntCounterVec::new(
        Opts::new("sm_query_late_responses_total", "Responses dropped for lack of a waiter"),
        &["kind"]
    ).expect("metric creation failed");

    /// Degraded responses published after a handler failure
    pub static ref QUERY_DEGRADED_RESPONSES: IntCounterVec = IntCounterVec::new(
        Opts::new("sm_query_degraded_responses_total", "Fallback responses from failed handlers"),
        &["kind"]
    ).expect("metric creation failed");

    /// Handler errors and panics
    pub static ref QUERY_HANDLER_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("sm_query_handler_failures_total", "Handler errors or panics caught by responders"),
        &["kind"]
    ).expect("metric creation failed");

    /// Registry entries removed by the expiry sweep
    pub static ref QUERY_EXPIRED: IntCounterVec = IntCounterVec::new(
        Opts::new("sm_query_expired_total", "Entries removed by the expiry sweep"),
        &["kind"]
    ).expect("metric creation failed");

    /// Queries currently waiting for a response
    pub static ref QUERIES_IN_FLIGHT: IntGaugeVec = IntGaugeVec::new(
        Opts::new("sm_query_in_flight", "Pending registry entries"),
        &["kind"]
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT BUS METRICS
    // =========================================================================

    /// Domain events published
    pub static ref EVENTS_PUBLISHED: IntCounterVec = IntCounterVec::new(
        Opts::new("sm_eventbus_events_published_total", "Domain events published"),
        &["event_type", "source_module"]
    ).expect("metric creation failed");

    /// Notifications appended to user inboxes
    pub static ref NOTIFICATIONS_DELIVERED: IntCounter = IntCounter::new(
        "sm_notifications_delivered_total",
        "Notifications appended to user inboxes"
    ).expect("metric creation failed");

    /// Users with at least one notification
    pub static ref NOTIFICATION_INBOXES: IntGauge = IntGauge::new(
        "sm_notifications_inboxes",
        "Number of user inboxes"
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================
}

/// Handle keeping the registry alive for the process lifetime.
#[derive(Clone)]
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// The registry metrics were registered with.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once: metrics already registered are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Query bus
        Box::new(QUERIES_ISSUED.clone()),
        Box::new(QUERIES_COMPLETED.clone()),
        Box::new(QUERY_TIMEOUTS.clone()),
        Box::new(QUERY_FALLBACKS.clone()),
        Box::new(QUERY_LATE_RESPONSES.clone()),
        Box::new(QUERY_DEGRADED_RESPONSES.clone()),
        Box::new(QUERY_HANDLER_FAILURES.clone()),
        Box::new(QUERY_EXPIRED.clone()),
        Box::new(QUERIES_IN_FLIGHT.clone()),
        // Event bus
        Box::new(EVENTS_PUBLISHED.clone()),
        Box::new(NOTIFICATIONS_DELIVERED.clone()),
        Box::new(NOTIFICATION_INBOXES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Mirror one lane's counters into the Prometheus series for its kind.
///
/// Counters only move forward; a snapshot older than what was already
/// recorded leaves them untouched.
pub fn record_query_stats(snapshot: &QueryStatsSnapshot) {
    let kind = snapshot.kind.as_str();

    advance(&QUERIES_ISSUED, kind, snapshot.issued);
    advance(&QUERIES_COMPLETED, kind, snapshot.completed);
    advance(&QUERY_TIMEOUTS, kind, snapshot.timeouts);
    advance(&QUERY_FALLBACKS, kind, snapshot.fallbacks);
    advance(&QUERY_LATE_RESPONSES, kind, snapshot.late_responses);
    advance(&QUERY_DEGRADED_RESPONSES, kind, snapshot.degraded_responses);
    advance(&QUERY_HANDLER_FAILURES, kind, snapshot.handler_failures);
    advance(&QUERY_EXPIRED, kind, snapshot.expired);

    QUERIES_IN_FLIGHT
        .with_label_values(&[kind])
        .set(i64::try_from(snapshot.in_flight).unwrap_or(i64::MAX));
}

fn advance(counter: &IntCounterVec, kind: &str, total: u64) {
    let series = counter.with_label_values(&[kind]);
    let current = series.get();
    if total > current {
        series.inc_by(total - current);
    }
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
