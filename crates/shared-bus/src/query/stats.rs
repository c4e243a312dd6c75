//! Per-kind counters for a query lane.

use crate::query::message::QueryKind;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, shared by a lane's registry, client, responder and router.
#[derive(Debug, Default)]
pub struct QueryStats {
    /// Queries registered by clients.
    pub issued: AtomicU64,
    /// Responses delivered to a waiting client.
    pub completed: AtomicU64,
    /// Client waits that hit the deadline.
    pub timeouts: AtomicU64,
    /// Fallback values handed to callers (timeouts, abandoned waits, registry faults).
    pub fallbacks: AtomicU64,
    /// Responses that found no waiter.
    pub late_responses: AtomicU64,
    /// Degraded responses seen by the router.
    pub degraded_responses: AtomicU64,
    /// Handler errors or panics caught by the responder.
    pub handler_failures: AtomicU64,
    /// Entries removed by the expiry sweep.
    pub expired: AtomicU64,
}

impl QueryStats {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy.
    #[must_use]
    pub fn snapshot(&self, kind: QueryKind, in_flight: usize) -> QueryStatsSnapshot {
        QueryStatsSnapshot {
            kind,
            issued: self.issued.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            late_responses: self.late_responses.load(Ordering::Relaxed),
            degraded_responses: self.degraded_responses.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            in_flight,
        }
    }
}

/// Copy of [`QueryStats`] plus the registry size at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryStatsSnapshot {
    pub kind: QueryKind,
    pub issued: u64,
    pub completed: u64,
    pub timeouts: u64,
    pub fallbacks: u64,
    pub late_responses: u64,
    pub degraded_responses: u64,
    pub handler_failures: u64,
    pub expired: u64,
    pub in_flight: usize,
}
