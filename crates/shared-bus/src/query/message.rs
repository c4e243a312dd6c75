//! Query message envelopes.
//!
//! A query kind is a request type implementing [`Query`]; its associated
//! `Response` type fixes, at compile time, what may answer it. Both sides
//! travel wrapped in an envelope carrying the [`CorrelationId`].

use crate::events::ModuleId;
use crate::query::correlation::CorrelationId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every query kind carried by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Fetch a user summary.
    GetUser,
    /// Are two users friends?
    IsFriend,
    /// How many friends do two users share?
    MutualFriendCount,
    /// Persist a friendship.
    SaveFriendship,
    /// Users never to recommend to a given user.
    ExcludedUserIds,
    /// Text search over users.
    SearchUsers,
}

impl QueryKind {
    /// All kinds, in declaration order.
    pub const ALL: [QueryKind; 6] = [
        QueryKind::GetUser,
        QueryKind::IsFriend,
        QueryKind::MutualFriendCount,
        QueryKind::SaveFriendship,
        QueryKind::ExcludedUserIds,
        QueryKind::SearchUsers,
    ];

    /// Stable snake_case name, used in logs, metrics labels and config keys.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetUser => "get_user",
            Self::IsFriend => "is_friend",
            Self::MutualFriendCount => "mutual_friend_count",
            Self::SaveFriendship => "save_friendship",
            Self::ExcludedUserIds => "excluded_user_ids",
            Self::SearchUsers => "search_users",
        }
    }

    /// The module that answers this kind.
    #[must_use]
    pub fn owner(&self) -> ModuleId {
        match self {
            Self::GetUser | Self::SearchUsers => ModuleId::Users,
            Self::IsFriend
            | Self::MutualFriendCount
            | Self::SaveFriendship
            | Self::ExcludedUserIds => ModuleId::Social,
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request type that can be asked over the bus.
pub trait Query: Clone + fmt::Debug + Send + Sync + 'static {
    /// The only type allowed to answer this query.
    type Response: Clone + fmt::Debug + Send + Sync + 'static;

    /// Routing and logging identity.
    const KIND: QueryKind;

    /// Value returned to the caller on timeout and published by the
    /// responder when its handler fails.
    fn fallback() -> Self::Response;
}

/// Request envelope. Immutable once published.
#[derive(Debug, Clone)]
pub struct QueryRequest<Q: Query> {
    /// Key the response must echo.
    pub correlation_id: CorrelationId,
    /// Module that asked.
    pub origin: ModuleId,
    /// Query-specific fields.
    pub query: Q,
}

/// How a response payload was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseOutcome {
    /// The handler returned normally.
    Answered,
    /// The handler failed; the payload is the kind's fallback.
    Degraded,
}

/// Response envelope. Carries the identical correlation id as its request.
#[derive(Debug, Clone)]
pub struct QueryResponse<Q: Query> {
    /// Copied from the request.
    pub correlation_id: CorrelationId,
    /// Handler result or fallback.
    pub payload: Q::Response,
    /// Whether `payload` is a real answer.
    pub outcome: ResponseOutcome,
}

impl<Q: Query> QueryResponse<Q> {
    /// A normal answer.
    #[must_use]
    pub fn answered(correlation_id: CorrelationId, payload: Q::Response) -> Self {
        Self {
            correlation_id,
            payload,
            outcome: ResponseOutcome::Answered,
        }
    }

    /// A fallback answer after handler failure.
    #[must_use]
    pub fn degraded(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            payload: Q::fallback(),
            outcome: ResponseOutcome::Degraded,
        }
    }

    /// True if the payload is a fallback.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.outcome == ResponseOutcome::Degraded
    }
}
