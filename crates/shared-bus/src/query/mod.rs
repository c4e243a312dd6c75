//! Request/response queries over the publish/subscribe bus.
//!
//! ```text
//!  asking module                                answering module
//! ┌──────────────┐  QueryRequest<Q>  ┌──────────────┐
//! │ QueryClient  │ ────────────────▶ │QueryResponder│──▶ QueryHandler<Q>
//! │   (waits)    │                   │              │
//! └──────▲───────┘                   └──────┬───────┘
//!        │ complete()                       │ QueryResponse<Q>
//! ┌──────┴───────┐                          │
//! │ Correlation  │◀─── ResponseRouter ◀─────┘
//! │   Registry   │
//! └──────────────┘
//! ```
//!
//! Every query kind gets its own [`QueryLane`]: separate request and
//! response queues, its own registry and its own counters. The queues are
//! bounded `mpsc` channels; a full queue makes the sender wait, it never
//! drops a request or a response. A client always
//! gets a value back, either the answer or the kind's fallback once its
//! timeout elapses.

pub mod bus;
mod channel;
pub mod client;
pub mod config;
pub mod correlation;
pub mod error;
pub mod kinds;
pub mod lane;
pub mod message;
pub mod registry;
pub mod responder;
pub mod router;
pub mod stats;

pub use bus::{HasLane, QueryBus};
pub use client::QueryClient;
pub use config::{QueryBusConfig, DEFAULT_QUERY_TIMEOUT_MS, DEFAULT_SWEEP_INTERVAL_MS};
pub use correlation::CorrelationId;
pub use error::{ConfigError, HandlerError, QueryError, RegistryError};
pub use kinds::{
    ExcludedUserIdsRequest, ExcludedUserIdsResponse, GetUserRequest, GetUserResponse,
    IsFriendRequest, IsFriendResponse, MutualFriendCountRequest, MutualFriendCountResponse,
    SaveFriendshipRequest, SaveFriendshipResponse, SearchUsersRequest, SearchUsersResponse,
};
pub use lane::QueryLane;
pub use message::{Query, QueryKind, QueryRequest, QueryResponse, ResponseOutcome};
pub use registry::{CorrelationRegistry, Waiter};
pub use responder::{handler_fn, FnHandler, QueryHandler, ResponderHandle};
pub use router::ResponseRouter;
pub use stats::{QueryStats, QueryStatsSnapshot};
