//! Query Server - answers one query kind exactly once per request.
//!
//! Each request is handled on its own task, never on the publisher's stack,
//! so a handler may itself ask other queries without deadlocking the bus.

use crate::query::error::HandlerError;
use crate::query::message::{Query, QueryRequest, QueryResponse};
use crate::query::stats::QueryStats;
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Business logic answering one query kind.
#[async_trait]
pub trait QueryHandler<Q: Query>: Send + Sync + 'static {
    /// Produce the answer for `query`.
    async fn handle(&self, query: Q) -> Result<Q::Response, HandlerError>;
}

/// Adapter turning an async closure into a [`QueryHandler`].
pub struct FnHandler<F>(F);

/// Wrap `f` as a handler.
pub fn handler_fn<F>(f: F) -> FnHandler<F> {
    FnHandler(f)
}

#[async_trait]
impl<Q, F, Fut> QueryHandler<Q> for FnHandler<F>
where
    Q: Query,
    F: Fn(Q) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Q::Response, HandlerError>> + Send + 'static,
{
    async fn handle(&self, query: Q) -> Result<Q::Response, HandlerError> {
        (self.0)(query).await
    }
}

/// Subscribed request listener for one query kind.
pub struct QueryResponder<Q: Query> {
    requests: mpsc::Receiver<QueryRequest<Q>>,
    responses: mpsc::Sender<QueryResponse<Q>>,
    handler: Arc<dyn QueryHandler<Q>>,
    stats: Arc<QueryStats>,
}

impl<Q: Query> QueryResponder<Q> {
    pub(crate) fn new(
        requests: mpsc::Receiver<QueryRequest<Q>>,
        responses: mpsc::Sender<QueryResponse<Q>>,
        handler: Arc<dyn QueryHandler<Q>>,
        stats: Arc<QueryStats>,
    ) -> Self {
        Self {
            requests,
            responses,
            handler,
            stats,
        }
    }

    /// Spawn the listener loop.
    pub(crate) fn spawn(self) -> ResponderHandle {
        let task = tokio::spawn(self.run());
        ResponderHandle {
            kind: Q::KIND.as_str(),
            task,
        }
    }

    async fn run(mut self) {
        info!(kind = %Q::KIND, "Query responder started");

        while let Some(request) = self.requests.recv().await {
            debug!(
                correlation_id = %request.correlation_id,
                kind = %Q::KIND,
                origin = %request.origin,
                "Received query"
            );
            tokio::spawn(answer(
                Arc::clone(&self.handler),
                self.responses.clone(),
                Arc::clone(&self.stats),
                request,
            ));
        }

        warn!(kind = %Q::KIND, "Request queue closed, query responder stopping");
    }
}

/// Run the handler inside a failure boundary and publish exactly one response.
async fn answer<Q: Query>(
    handler: Arc<dyn QueryHandler<Q>>,
    responses: mpsc::Sender<QueryResponse<Q>>,
    stats: Arc<QueryStats>,
    request: QueryRequest<Q>,
) {
    let correlation_id = request.correlation_id;
    let outcome = AssertUnwindSafe(handler.handle(request.query))
        .catch_unwind()
        .await;

    let response = match outcome {
        Ok(Ok(payload)) => QueryResponse::answered(correlation_id, payload),
        Ok(Err(e)) => {
            QueryStats::bump(&stats.handler_failures);
            error!(
                correlation_id = %correlation_id,
                kind = %Q::KIND,
                error = %e,
                "Query handler failed, answering with fallback"
            );
            QueryResponse::degraded(correlation_id)
        }
        Err(panic) => {
            QueryStats::bump(&stats.handler_failures);
            error!(
                correlation_id = %correlation_id,
                kind = %Q::KIND,
                panic = %panic_message(panic.as_ref()),
                "Query handler panicked, answering with fallback"
            );
            QueryResponse::degraded(correlation_id)
        }
    };

    if responses.send(response).await.is_ok() {
        debug!(correlation_id = %correlation_id, kind = %Q::KIND, "Sent query response");
    } else {
        // Only happens once the lane has shut down; the waiter is already released.
        warn!(correlation_id = %correlation_id, kind = %Q::KIND, "Response router gone, answer dropped");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Handle to a running responder.
pub struct ResponderHandle {
    kind: &'static str,
    task: JoinHandle<()>,
}

impl ResponderHandle {
    /// Query kind served.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Abort handle, so the owning lane can stop it at shutdown.
    pub(crate) fn abort_handle(&self) -> tokio::task::AbortHandle {
        self.task.abort_handle()
    }

    /// Stop listening. Requests already being handled still get answered.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Whether the listener loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
