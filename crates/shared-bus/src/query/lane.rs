//! One query kind's plumbing: request channel, response channel, registry,
//! router and the responders serving it.

use crate::events::ModuleId;
use crate::query::channel::RequestFanout;
use crate::query::client::QueryClient;
use crate::query::message::{Query, QueryKind, QueryRequest, QueryResponse};
use crate::query::registry::CorrelationRegistry;
use crate::query::responder::{QueryHandler, QueryResponder, ResponderHandle};
use crate::query::router::ResponseRouter;
use crate::query::stats::{QueryStats, QueryStatsSnapshot};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info};

/// Typed request/response lane for query kind `Q`.
pub struct QueryLane<Q: Query> {
    requests: Arc<RequestFanout<Q>>,
    /// Cloned into every responder; the router holds the receiving end.
    responses: mpsc::Sender<QueryResponse<Q>>,
    registry: Arc<CorrelationRegistry<Q::Response>>,
    stats: Arc<QueryStats>,
    /// Subscribed at construction, taken by `start()`.
    router: Mutex<Option<ResponseRouter<Q>>>,
    router_running: Arc<AtomicBool>,
    /// Router and responder tasks, aborted at shutdown.
    tasks: Mutex<Vec<AbortHandle>>,
    timeout: Duration,
}

impl<Q: Query> QueryLane<Q> {
    /// Create a lane. Its router owns the response queue immediately but is
    /// not yet running; responses sent before `start()` wait in the queue.
    ///
    /// Both queues are bounded by `channel_capacity` and apply backpressure
    /// when full rather than dropping traffic.
    pub fn new(timeout: Duration, channel_capacity: usize) -> Self {
        let stats = Arc::new(QueryStats::default());
        let requests = Arc::new(RequestFanout::new(channel_capacity));
        let (responses, response_rx) = mpsc::channel(channel_capacity.max(1));
        let registry = Arc::new(CorrelationRegistry::new(Q::KIND, Arc::clone(&stats)));
        let router_running = Arc::new(AtomicBool::new(false));

        let router = ResponseRouter::new(
            response_rx,
            Arc::clone(&registry),
            Arc::clone(&stats),
            Arc::clone(&router_running),
        );

        Self {
            requests,
            responses,
            registry,
            stats,
            router: Mutex::new(Some(router)),
            router_running,
            tasks: Mutex::new(Vec::new()),
            timeout,
        }
    }

    /// Spawn the response router. Returns `false` if it was already started.
    pub fn start(&self) -> bool {
        let Some(router) = self.router.lock().take() else {
            return false;
        };
        self.router_running.store(true, Ordering::Release);
        let task = tokio::spawn(router.run());
        self.tasks.lock().push(task.abort_handle());
        debug!(kind = %Q::KIND, "Query lane started");
        true
    }

    /// A client asking on behalf of `origin`.
    pub fn client(&self, origin: ModuleId) -> QueryClient<Q> {
        QueryClient::new(
            origin,
            Arc::clone(&self.requests),
            Arc::clone(&self.registry),
            Arc::clone(&self.stats),
            Arc::clone(&self.router_running),
            self.timeout,
        )
    }

    /// Register `handler` as a responder for this kind.
    ///
    /// The responder is subscribed before this returns; requests published
    /// afterwards are guaranteed to reach it. Registering more than one
    /// responder per kind makes every request answered more than once; the
    /// first answer wins and the rest are dropped as late responses.
    pub fn serve<H: QueryHandler<Q>>(&self, handler: H) -> ResponderHandle {
        self.serve_shared(Arc::new(handler))
    }

    /// Like [`serve`](Self::serve) for an already shared handler.
    pub fn serve_shared(&self, handler: Arc<dyn QueryHandler<Q>>) -> ResponderHandle {
        let responder = QueryResponder::new(
            self.requests.subscribe(),
            self.responses.clone(),
            handler,
            Arc::clone(&self.stats),
        );
        let handle = responder.spawn();
        self.tasks.lock().push(handle.abort_handle());
        handle
    }

    /// Stop router and responders and drop every pending entry.
    ///
    /// Waiters still blocked observe an abandoned wait and fall back.
    pub fn shutdown(&self) -> usize {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        self.router_running.store(false, Ordering::Release);
        let cleared = self.registry.clear();
        info!(kind = %Q::KIND, cleared = cleared, "Query lane shut down");
        cleared
    }

    /// Entries currently in flight.
    pub fn pending_count(&self) -> usize {
        self.registry.pending_count()
    }

    /// Sweep entries past their deadline.
    pub fn remove_expired(&self) -> usize {
        self.registry.remove_expired()
    }

    /// Point-in-time counters.
    pub fn stats_snapshot(&self) -> QueryStatsSnapshot {
        self.registry.stats()
    }

    /// Number of responders currently subscribed.
    pub fn responder_count(&self) -> usize {
        self.requests.subscriber_count()
    }

    /// Default timeout for this lane's clients.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the router is running.
    pub fn is_started(&self) -> bool {
        self.router_running.load(Ordering::Acquire)
    }

}

/// Kind-erased operations the bus runs over every lane.
pub(crate) trait LaneControl: Send + Sync {
    fn kind(&self) -> QueryKind;
    fn start(&self) -> bool;
    fn shutdown(&self) -> usize;
    fn pending_count(&self) -> usize;
    fn remove_expired(&self) -> usize;
    fn stats_snapshot(&self) -> QueryStatsSnapshot;
}

impl<Q: Query> LaneControl for QueryLane<Q> {
    fn kind(&self) -> QueryKind {
        Q::KIND
    }

    fn start(&self) -> bool {
        QueryLane::start(self)
    }

    fn shutdown(&self) -> usize {
        QueryLane::shutdown(self)
    }

    fn pending_count(&self) -> usize {
        QueryLane::pending_count(self)
    }

    fn remove_expired(&self) -> usize {
        QueryLane::remove_expired(self)
    }

    fn stats_snapshot(&self) -> QueryStatsSnapshot {
        QueryLane::stats_snapshot(self)
    }
}
