//! # Shared Bus - Event and Query Bus for Inter-Module Communication
//!
//! Modules never call each other directly. They talk through two kinds of
//! traffic:
//!
//! - **Events** ([`SocialEvent`]): fire-and-forget notifications such as
//!   "friendship created", broadcast on an [`InMemoryEventBus`]. A
//!   subscriber that falls behind skips old events.
//! - **Queries** ([`query`]): a request that needs an answer, such as "are
//!   these two users friends?". Carried on bounded per-kind queues that
//!   never drop a message. The asking side waits a bounded time and gets a
//!   safe fallback if nobody answers.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │   Module A   │                    │   Module B   │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │     Bus      │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod query;
pub mod subscriber;

// Re-export main types
pub use events::{BusEvent, EventFilter, EventTopic, ModuleId, SocialEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use query::{
    handler_fn, CorrelationId, HandlerError, Query, QueryBus, QueryBusConfig, QueryClient,
    QueryError, QueryHandler, QueryKind, QueryStatsSnapshot, ResponderHandle,
};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Messages buffered per event subscriber and per query queue.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
