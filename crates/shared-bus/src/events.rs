//! # Social Events
//!
//! Defines the event vocabulary of the bus: the `BusEvent` contract every
//! message type implements, topic/module routing keys, and the domain
//! notifications modules broadcast to each other.

use serde::{Deserialize, Serialize};
use shared_types::{ActivityId, UserId, UserSummary, Visibility};
use std::fmt;

/// Contract for anything that travels on an [`InMemoryEventBus`](crate::InMemoryEventBus).
///
/// Events are immutable value objects: the bus clones them once per
/// subscriber and never mutates them.
pub trait BusEvent: Clone + fmt::Debug + Send + Sync + 'static {
    /// Topic used for subscription filtering.
    fn topic(&self) -> EventTopic;

    /// The module that emitted the event.
    fn source(&self) -> ModuleId;

    /// Short static name for logs.
    fn label(&self) -> &'static str;
}

/// Modules that may publish on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleId {
    /// User module (profiles, search, recommendations).
    Users,
    /// Social module (friend requests, friendships, blocks).
    Social,
    /// Activity module.
    Activities,
    /// The runtime itself (wiring, notifications, admin tooling).
    Runtime,
}

impl ModuleId {
    /// Stable lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Social => "social",
            Self::Activities => "activities",
            Self::Runtime => "runtime",
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All domain notifications that can be published to the event bus.
///
/// These are fire-and-forget: nobody answers them. Request/response traffic
/// uses the typed query lanes instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SocialEvent {
    // =========================================================================
    // USERS
    // =========================================================================
    /// A new account was created.
    UserRegistered {
        /// Public view of the new user.
        user: UserSummary,
    },

    // =========================================================================
    // SOCIAL GRAPH
    // =========================================================================
    /// A friend request was sent.
    FriendRequestSent {
        /// Requester.
        from: UserId,
        /// Recipient.
        to: UserId,
    },

    /// Two users became friends.
    FriendshipCreated {
        /// First member (the one who accepted, when known).
        user_a: UserId,
        /// Second member.
        user_b: UserId,
    },

    // =========================================================================
    // ACTIVITIES
    // =========================================================================
    /// An activity was published.
    ActivityCreated {
        /// New activity.
        activity_id: ActivityId,
        /// Its host.
        host_id: UserId,
        /// Title, for notification text.
        title: String,
        /// Who can see it.
        visibility: Visibility,
    },

    /// A user joined an activity.
    ActivityJoined {
        /// The activity.
        activity_id: ActivityId,
        /// Host to notify.
        host_id: UserId,
        /// The user who joined.
        participant_id: UserId,
    },
}

impl BusEvent for SocialEvent {
    fn topic(&self) -> EventTopic {
        match self {
            Self::UserRegistered { .. } => EventTopic::Users,
            Self::FriendRequestSent { .. } | Self::FriendshipCreated { .. } => EventTopic::Social,
            Self::ActivityCreated { .. } | Self::ActivityJoined { .. } => EventTopic::Activities,
        }
    }

    fn source(&self) -> ModuleId {
        match self {
            Self::UserRegistered { .. } => ModuleId::Users,
            Self::FriendRequestSent { .. } | Self::FriendshipCreated { .. } => ModuleId::Social,
            Self::ActivityCreated { .. } | Self::ActivityJoined { .. } => ModuleId::Activities,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "user_registered",
            Self::FriendRequestSent { .. } => "friend_request_sent",
            Self::FriendshipCreated { .. } => "friendship_created",
            Self::ActivityCreated { .. } => "activity_created",
            Self::ActivityJoined { .. } => "activity_joined",
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// User module events.
    Users,
    /// Social graph events.
    Social,
    /// Activity events.
    Activities,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source modules to include. Empty means all sources.
    pub sources: Vec<ModuleId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            sources: Vec::new(),
        }
    }

    /// Create a filter for events from specific modules.
    #[must_use]
    pub fn from_modules(sources: Vec<ModuleId>) -> Self {
        Self {
            topics: Vec::new(),
            sources,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches<E: BusEvent>(&self, event: &E) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.sources.is_empty() || self.sources.contains(&event.source());

        topic_match && source_match
    }
}
