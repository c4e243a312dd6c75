//! # Event Publisher
//!
//! Defines the publishing side of the event bus.

use crate::events::{BusEvent, EventFilter};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing events to the bus.
///
/// This is the only operation modules need from the channel to emit
/// events or query traffic.
#[async_trait]
pub trait EventPublisher<E: BusEvent>: Send + Sync {
    /// Publish an event to the bus.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the event.
    async fn publish(&self, event: E) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// Broadcast channel carrying one message type `E`.
///
/// Every subscriber gets its own copy and consumes it on its own task, so a
/// publisher never runs a listener on its own stack. Used both for domain
/// events and for each query kind's request and response traffic.
pub struct InMemoryEventBus<E: BusEvent> {
    sender: broadcast::Sender<E>,
    events_published: AtomicU64,
    capacity: usize,
}

impl<E: BusEvent> InMemoryEventBus<E> {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory event bus with specified capacity.
    ///
    /// A capacity of zero is bumped to one; broadcast channels cannot be empty.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    ///
    /// Events published after this call returns are delivered; earlier ones are not.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription<E> {
        debug!(topics = ?filter.topics, sources = ?filter.sources, "New subscription created");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Get a stream of events matching a filter.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream<E> {
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<E: BusEvent> Default for InMemoryEventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: BusEvent> EventPublisher<E> for InMemoryEventBus<E> {
    async fn publish(&self, event: E) -> usize {
        let (topic, source, label) = (event.topic(), event.source(), event.label());
        self.events_published.fetch_add(1, Ordering::Relaxed);

        // `send` only fails when nobody is subscribed; the message is gone.
        let receivers = self.sender.send(event).unwrap_or(0);
        if receivers == 0 {
            warn!(topic = ?topic, source = %source, event = label, "Published with no receivers");
        } else {
            debug!(topic = ?topic, source = %source, event = label, receivers, "Published");
        }
        receivers
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
