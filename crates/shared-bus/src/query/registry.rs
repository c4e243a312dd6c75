//! Correlation Registry - pending-waiter bookkeeping for in-flight queries.
//!
//! Maps correlation IDs to the completion half of a oneshot channel. The
//! asking side holds the other half inside a [`Waiter`].
//!
//! Flow:
//! 1. Client generates a CorrelationId and calls `register()` to get a `Waiter`
//! 2. Client publishes the request carrying that id
//! 3. Response router receives the response and calls `complete()`
//! 4. Client awaits the `Waiter` or times out
//! 5. The `Waiter` drop removes whatever is left of the entry

use crate::query::correlation::CorrelationId;
use crate::query::error::{QueryError, RegistryError};
use crate::query::message::QueryKind;
use crate::query::stats::{QueryStats, QueryStatsSnapshot};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// A pending query waiting for its response.
struct PendingQuery<T> {
    /// Single-assignment completion handle.
    sender: oneshot::Sender<T>,
    /// When the query was registered.
    created_at: Instant,
    /// Deadline used by the expiry sweep.
    timeout: Duration,
}

/// Thread-safe storage and single-shot completion of waiters for one query kind.
///
/// Every operation is a single atomic step with respect to a given id:
/// `complete` and `remove` both take the entry out of the map, so whichever
/// runs first wins and the other becomes a no-op.
pub struct CorrelationRegistry<T> {
    kind: QueryKind,
    pending: DashMap<CorrelationId, PendingQuery<T>>,
    stats: Arc<QueryStats>,
}

impl<T: Send + 'static> CorrelationRegistry<T> {
    /// Create an empty registry.
    pub fn new(kind: QueryKind, stats: Arc<QueryStats>) -> Self {
        Self {
            kind,
            pending: DashMap::new(),
            stats,
        }
    }

    /// Register `id` and get the waiter that will receive its response.
    ///
    /// `timeout` is only used by [`remove_expired`](Self::remove_expired);
    /// the waiter's own deadline is passed to [`Waiter::wait`].
    pub fn register(
        self: &Arc<Self>,
        id: CorrelationId,
        timeout: Duration,
    ) -> Result<Waiter<T>, RegistryError> {
        let (tx, rx) = oneshot::channel();
        let created_at = Instant::now();

        match self.pending.entry(id) {
            Entry::Occupied(_) => {
                debug_assert!(false, "duplicate correlation id {id}");
                return Err(RegistryError::DuplicateCorrelationId(id));
            }
            Entry::Vacant(slot) => {
                slot.insert(PendingQuery {
                    sender: tx,
                    created_at,
                    timeout,
                });
            }
        }

        QueryStats::bump(&self.stats.issued);
        debug!(correlation_id = %id, kind = %self.kind, "Registered pending query");

        Ok(Waiter {
            id,
            kind: self.kind,
            created_at,
            receiver: rx,
            registry: Arc::clone(self),
        })
    }

    /// Complete a pending query with its payload.
    ///
    /// Returns `true` if a waiter received the payload. An unknown id (already
    /// completed, timed out, or never registered) is a no-op returning `false`.
    pub fn complete(&self, id: CorrelationId, payload: T) -> bool {
        let Some((_, pending)) = self.pending.remove(&id) else {
            QueryStats::bump(&self.stats.late_responses);
            debug!(
                correlation_id = %id,
                kind = %self.kind,
                "Response for unknown or expired correlation ID"
            );
            return false;
        };

        let elapsed = pending.created_at.elapsed();
        match pending.sender.send(payload) {
            Ok(()) => {
                QueryStats::bump(&self.stats.completed);
                debug!(
                    correlation_id = %id,
                    kind = %self.kind,
                    response_time_ms = elapsed.as_millis(),
                    "Completed pending query"
                );
                true
            }
            Err(_) => {
                // Waiter dropped between its deadline and its cleanup.
                QueryStats::bump(&self.stats.late_responses);
                debug!(correlation_id = %id, kind = %self.kind, "Pending query waiter dropped");
                false
            }
        }
    }

    /// Remove an entry unconditionally. Returns whether it was present.
    pub fn remove(&self, id: &CorrelationId) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Remove entries older than their registered timeout.
    ///
    /// Returns the number of entries removed. Their waiters observe
    /// [`QueryError::Abandoned`].
    pub fn remove_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.pending.retain(|id, pending| {
            let elapsed = now.duration_since(pending.created_at);
            if elapsed > pending.timeout {
                warn!(
                    correlation_id = %id,
                    kind = %self.kind,
                    elapsed_ms = elapsed.as_millis(),
                    timeout_ms = pending.timeout.as_millis(),
                    "Removing expired pending query"
                );
                QueryStats::bump(&self.stats.expired);
                removed += 1;
                false
            } else {
                true
            }
        });

        removed
    }

    /// Drop every entry. Used at shutdown.
    pub fn clear(&self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Get number of currently pending queries
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check if a correlation ID is pending
    pub fn is_pending(&self, id: &CorrelationId) -> bool {
        self.pending.contains_key(id)
    }

    /// Counters for this registry's lane, with the current entry count.
    pub fn stats(&self) -> QueryStatsSnapshot {
        self.stats.snapshot(self.kind, self.pending_count())
    }

    /// The kind this registry serves.
    pub fn kind(&self) -> QueryKind {
        self.kind
    }
}

/// The asking side of one in-flight query.
///
/// Dropping a `Waiter` removes its registry entry, whatever path got there:
/// response, timeout, error, or cancellation of the awaiting future.
pub struct Waiter<T: Send + 'static> {
    id: CorrelationId,
    kind: QueryKind,
    created_at: Instant,
    receiver: oneshot::Receiver<T>,
    registry: Arc<CorrelationRegistry<T>>,
}

impl<T: Send + 'static> Waiter<T> {
    /// Correlation id this waiter listens for.
    pub fn id(&self) -> CorrelationId {
        self.id
    }

    /// Wait for the response up to `timeout`.
    pub async fn wait(mut self, timeout: Duration) -> Result<T, QueryError> {
        match tokio::time::timeout(timeout, &mut self.receiver).await {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(_)) => Err(QueryError::Abandoned { kind: self.kind }),
            Err(_) => {
                QueryStats::bump(&self.registry.stats.timeouts);
                Err(QueryError::Timeout {
                    kind: self.kind,
                    after: timeout,
                })
            }
        }
    }
}

impl<T: Send + 'static> Drop for Waiter<T> {
    fn drop(&mut self) {
        if self.registry.remove(&self.id) {
            debug!(
                correlation_id = %self.id,
                kind = %self.kind,
                age_ms = self.created_at.elapsed().as_millis(),
                "Removed unanswered pending query"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    fn registry() -> Arc<CorrelationRegistry<u32>> {
        Arc::new(CorrelationRegistry::new(
            QueryKind::MutualFriendCount,
            Arc::new(QueryStats::default()),
        ))
    }

    #[tokio::test]
    async fn test_register_and_complete() {
        let registry = registry();
        let id = CorrelationId::new();

        let waiter = registry.register(id, Duration::from_secs(30)).unwrap();
        assert!(registry.is_pending(&id));
        assert_eq!(registry.pending_count(), 1);

        assert!(registry.complete(id, 7));
        assert_eq!(registry.pending_count(), 0);

        let value = waiter.wait(Duration::from_secs(1)).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_complete_unknown_id_is_noop() {
        let registry = registry();
        assert!(!registry.complete(CorrelationId::new(), 1));
        assert_eq!(registry.stats().late_responses, 1);
    }

    #[tokio::test]
    async fn test_second_completion_is_noop() {
        let registry = registry();
        let id = CorrelationId::new();
        let waiter = registry.register(id, Duration::from_secs(30)).unwrap();

        assert!(registry.complete(id, 1));
        assert!(!registry.complete(id, 2));

        // First writer wins.
        assert_eq!(waiter.wait(Duration::from_secs(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let registry = registry();
        let id = CorrelationId::new();
        let _waiter = registry.register(id, Duration::from_secs(30)).unwrap();

        // debug_assert fires in debug builds; only check release behaviour there.
        if !cfg!(debug_assertions) {
            assert!(matches!(
                registry.register(id, Duration::from_secs(30)),
                Err(RegistryError::DuplicateCorrelationId(_))
            ));
        }
        assert_eq!(registry.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_timeout_removes_entry() {
        let registry = registry();
        let id = CorrelationId::new();
        let waiter = registry.register(id, Duration::from_secs(30)).unwrap();

        let result = waiter.wait(Duration::from_millis(20)).await;
        assert!(matches!(result, Err(QueryError::Timeout { .. })));
        assert!(!registry.is_pending(&id));
        assert_eq!(registry.stats.timeouts.load(Ordering::Relaxed), 1);

        // Late response after cleanup is absorbed.
        assert!(!registry.complete(id, 9));
    }

    #[tokio::test]
    async fn test_dropping_waiter_removes_entry() {
        let registry = registry();
        let id = CorrelationId::new();
        let waiter = registry.register(id, Duration::from_secs(30)).unwrap();
        assert_eq!(registry.pending_count(), 1);

        drop(waiter);
        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_wait_removes_entry() {
        let registry = registry();
        let id = CorrelationId::new();
        let waiter = registry.register(id, Duration::from_secs(30)).unwrap();

        let task = tokio::spawn(waiter.wait(Duration::from_secs(30)));
        tokio::task::yield_now().await;
        task.abort();
        let _ = task.await;

        assert!(!registry.is_pending(&id));
    }

    #[tokio::test]
    async fn test_remove_expired() {
        let registry = registry();

        let w1 = registry.register(CorrelationId::new(), Duration::from_millis(10)).unwrap();
        let w2 = registry.register(CorrelationId::new(), Duration::from_millis(10)).unwrap();
        let _w3 = registry.register(CorrelationId::new(), Duration::from_secs(30)).unwrap();
        assert_eq!(registry.pending_count(), 3);

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(registry.remove_expired(), 2);
        assert_eq!(registry.pending_count(), 1);

        // Swept waiters see their handle dropped.
        assert!(matches!(
            w1.wait(Duration::from_secs(1)).await,
            Err(QueryError::Abandoned { .. })
        ));
        drop(w2);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let registry = registry();
        let id = CorrelationId::new();
        let _w1 = registry.register(id, Duration::from_secs(30)).unwrap();
        let _w2 = registry.register(CorrelationId::new(), Duration::from_secs(30)).unwrap();

        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert_eq!(registry.clear(), 1);
        assert_eq!(registry.pending_count(), 0);
    }
}
