//! Response Router - delivers responses to their waiters.
//!
//! The only writer to a registry from the answering side. No business logic.

use crate::query::message::{Query, QueryResponse};
use crate::query::registry::CorrelationRegistry;
use crate::query::stats::QueryStats;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Listener co-located with the client side of one lane.
///
/// Owns the lane's response queue from construction, so nothing answered
/// before `start()` is lost; spawned by the lane's `start()`.
pub struct ResponseRouter<Q: Query> {
    responses: mpsc::Receiver<QueryResponse<Q>>,
    registry: Arc<CorrelationRegistry<Q::Response>>,
    stats: Arc<QueryStats>,
    running: Arc<AtomicBool>,
}

impl<Q: Query> ResponseRouter<Q> {
    pub(crate) fn new(
        responses: mpsc::Receiver<QueryResponse<Q>>,
        registry: Arc<CorrelationRegistry<Q::Response>>,
        stats: Arc<QueryStats>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            responses,
            registry,
            stats,
            running,
        }
    }

    /// Route responses until every responder and the lane are gone.
    pub async fn run(mut self) {
        self.running.store(true, Ordering::Release);
        info!(kind = %Q::KIND, "Response router started");

        while let Some(response) = self.responses.recv().await {
            self.route(response);
        }

        self.running.store(false, Ordering::Release);
        warn!(kind = %Q::KIND, "Response channel closed, router stopping");
    }

    fn route(&self, response: QueryResponse<Q>) {
        if response.is_degraded() {
            QueryStats::bump(&self.stats.degraded_responses);
        }

        let correlation_id = response.correlation_id;
        if !self.registry.complete(correlation_id, response.payload) {
            debug!(
                correlation_id = %correlation_id,
                kind = %Q::KIND,
                "Dropped response with no waiter"
            );
        }
    }
}
