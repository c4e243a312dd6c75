//! Query bus error types.
//!
//! None of these cross `QueryClient::ask`; callers that want them use
//! `try_ask`.

use crate::query::correlation::CorrelationId;
use crate::query::message::QueryKind;
use std::time::Duration;
use thiserror::Error;

/// Registry misuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An id was registered twice. Random v4 ids make this a logic fault.
    #[error("Correlation id {0} is already registered")]
    DuplicateCorrelationId(CorrelationId),
}

/// Why a query produced no real answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// No response before the deadline.
    #[error("{kind} query timed out after {}ms", .after.as_millis())]
    Timeout { kind: QueryKind, after: Duration },

    /// The waiter's completion handle was dropped without a value
    /// (registry swept or cleared while the caller was waiting).
    #[error("{kind} query abandoned before a response arrived")]
    Abandoned { kind: QueryKind },

    /// Registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Failure inside a business handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// Referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The query's fields were rejected.
    #[error("Invalid query: {0}")]
    Invalid(String),

    /// Anything else.
    #[error("Handler failed: {0}")]
    Internal(String),
}

impl HandlerError {
    pub fn internal(details: impl Into<String>) -> Self {
        Self::Internal(details.into())
    }

    pub fn invalid(details: impl Into<String>) -> Self {
        Self::Invalid(details.into())
    }
}

/// Query bus configuration problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
}
