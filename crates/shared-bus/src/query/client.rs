//! Query Client - turns a fire-and-forget publish into a bounded call.

use crate::events::ModuleId;
use crate::query::channel::RequestFanout;
use crate::query::correlation::CorrelationId;
use crate::query::error::QueryError;
use crate::query::message::{Query, QueryRequest};
use crate::query::registry::CorrelationRegistry;
use crate::query::stats::QueryStats;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, warn};

/// Stand-in deadline for timeouts too large to add to `Instant::now()`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Asking side of one query lane.
///
/// Cheap to clone; every clone shares the lane's registry and request channel.
pub struct QueryClient<Q: Query> {
    origin: ModuleId,
    requests: Arc<RequestFanout<Q>>,
    registry: Arc<CorrelationRegistry<Q::Response>>,
    stats: Arc<QueryStats>,
    router_running: Arc<AtomicBool>,
    default_timeout: Duration,
}

impl<Q: Query> Clone for QueryClient<Q> {
    fn clone(&self) -> Self {
        Self {
            origin: self.origin,
            requests: Arc::clone(&self.requests),
            registry: Arc::clone(&self.registry),
            stats: Arc::clone(&self.stats),
            router_running: Arc::clone(&self.router_running),
            default_timeout: self.default_timeout,
        }
    }
}

impl<Q: Query> QueryClient<Q> {
    pub(crate) fn new(
        origin: ModuleId,
        requests: Arc<RequestFanout<Q>>,
        registry: Arc<CorrelationRegistry<Q::Response>>,
        stats: Arc<QueryStats>,
        router_running: Arc<AtomicBool>,
        default_timeout: Duration,
    ) -> Self {
        Self {
            origin,
            requests,
            registry,
            stats,
            router_running,
            default_timeout,
        }
    }

    /// Ask with the lane's configured timeout.
    pub async fn ask(&self, query: Q) -> Q::Response {
        self.ask_with_timeout(query, self.default_timeout).await
    }

    /// Ask and wait up to `timeout`.
    ///
    /// Never fails: a timeout or any other problem while waiting is logged
    /// and the kind's fallback is returned instead.
    pub async fn ask_with_timeout(&self, query: Q, timeout: Duration) -> Q::Response {
        match self.try_ask(query, timeout).await {
            Ok(response) => response,
            Err(e) => {
                QueryStats::bump(&self.stats.fallbacks);
                match &e {
                    QueryError::Timeout { .. } | QueryError::Abandoned { .. } => {
                        warn!(kind = %Q::KIND, origin = %self.origin, error = %e, "Query fell back to default");
                    }
                    QueryError::Registry(_) => {
                        error!(kind = %Q::KIND, origin = %self.origin, error = %e, "Query fell back to default");
                    }
                }
                Q::fallback()
            }
        }
    }

    /// Ask and surface why no real answer arrived.
    ///
    /// A degraded response (the responder's handler failed) is still `Ok`:
    /// the caller received a value, not a timeout. `timeout` covers the whole
    /// call, including any wait for room in a busy responder's queue.
    pub async fn try_ask(&self, query: Q, timeout: Duration) -> Result<Q::Response, QueryError> {
        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);
        let correlation_id = CorrelationId::new();
        let waiter = self.registry.register(correlation_id, timeout)?;

        if !self.router_running.load(Ordering::Acquire) {
            warn!(
                correlation_id = %correlation_id,
                kind = %Q::KIND,
                "Response router not started; the answer waits until it is"
            );
        }

        let request = QueryRequest {
            correlation_id,
            origin: self.origin,
            query,
        };

        let Ok(receivers) = tokio::time::timeout_at(deadline, self.requests.publish(request)).await
        else {
            QueryStats::bump(&self.stats.timeouts);
            return Err(QueryError::Timeout {
                kind: Q::KIND,
                after: timeout,
            });
        };
        if receivers == 0 {
            warn!(
                correlation_id = %correlation_id,
                kind = %Q::KIND,
                "No responder subscribed for query"
            );
        } else {
            debug!(
                correlation_id = %correlation_id,
                kind = %Q::KIND,
                origin = %self.origin,
                receivers = receivers,
                "Published query"
            );
        }

        waiter
            .wait(deadline.saturating_duration_since(Instant::now()))
            .await
            .map_err(|e| match e {
                QueryError::Timeout { kind, .. } => QueryError::Timeout {
                    kind,
                    after: timeout,
                },
                other => other,
            })
    }

    /// Timeout used by [`ask`](Self::ask).
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Module this client asks on behalf of.
    pub fn origin(&self) -> ModuleId {
        self.origin
    }
}
