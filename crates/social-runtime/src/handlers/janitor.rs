//! Registry janitor.
//!
//! Backstop for waiters whose owning future was leaked: every tick sweeps
//! expired registry entries on all lanes, purges expired activities and
//! mirrors lane stats into Prometheus.

use shared_bus::QueryBus;
use sm_03_activities::ActivityApi;
use social_telemetry::record_query_stats;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// What one sweep removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub expired_queries: usize,
    pub expired_activities: usize,
    pub in_flight: usize,
}

/// Run one sweep.
pub fn sweep<A: ActivityApi + ?Sized>(queries: &QueryBus, activities: &A) -> SweepReport {
    let report = SweepReport {
        expired_queries: queries.remove_expired(),
        expired_activities: activities.purge_expired(),
        in_flight: queries.pending_total(),
    };
    for snapshot in queries.stats_snapshots() {
        record_query_stats(&snapshot);
    }
    report
}

/// Background task sweeping every `interval`.
pub async fn cleanup_task<A: ActivityApi + ?Sized>(
    queries: Arc<QueryBus>,
    activities: Arc<A>,
    interval: Duration,
) {
    let mut cleanup_interval = tokio::time::interval(interval);
    cleanup_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        cleanup_interval.tick().await;
        let report = sweep(&queries, activities.as_ref());
        if report.expired_queries > 0 || report.expired_activities > 0 {
            debug!(
                expired_queries = report.expired_queries,
                expired_activities = report.expired_activities,
                in_flight = report.in_flight,
                "Janitor sweep"
            );
        }
    }
}
