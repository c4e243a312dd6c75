//! Lossless request fan-out for one query kind.
//!
//! Every responder owns a bounded `mpsc` queue. Publishing waits for room in
//! each queue instead of overwriting old requests, so a burst of asks larger
//! than the channel capacity slows the askers down but never loses a request.

use crate::query::message::{Query, QueryRequest};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::debug;

/// Request side of a lane: one sender per subscribed responder.
pub(crate) struct RequestFanout<Q: Query> {
    senders: RwLock<Vec<mpsc::Sender<QueryRequest<Q>>>>,
    capacity: usize,
}

impl<Q: Query> RequestFanout<Q> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            senders: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    /// New responder queue. Requests published after this returns reach it.
    pub(crate) fn subscribe(&self) -> mpsc::Receiver<QueryRequest<Q>> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.senders.write().push(tx);
        rx
    }

    /// Deliver `request` to every live responder, waiting for queue space.
    ///
    /// Returns how many responders received it.
    pub(crate) async fn publish(&self, request: QueryRequest<Q>) -> usize {
        // Clone the senders out so no lock is held across an await.
        let senders: Vec<_> = self.senders.read().clone();
        let mut delivered = 0;
        let mut closed = 0;

        for sender in &senders {
            if sender.send(request.clone()).await.is_ok() {
                delivered += 1;
            } else {
                closed += 1;
            }
        }

        if closed > 0 {
            self.senders.write().retain(|s| !s.is_closed());
            debug!(kind = %Q::KIND, closed, "Pruned stopped responders");
        }
        delivered
    }

    /// Responders still listening.
    pub(crate) fn subscriber_count(&self) -> usize {
        self.senders.read().iter().filter(|s| !s.is_closed()).count()
    }
}
