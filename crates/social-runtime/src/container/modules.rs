//! # Module Container
//!
//! Holds every module service and the two buses they share.
//!
//! ## Wiring
//!
//! ```text
//!   Users ──ExcludedUserIds / MutualFriendCount──► Social
//!   Social ──GetUser──────────────────────────────► Users
//!   Activities ──GetUser / IsFriend───────────────► Users / Social
//!   Runtime (notifications) ──GetUser─────────────► Users
//! ```
//!
//! Modules hold bus gateways, never each other. Responders are registered
//! here, before the bus is started, so no early request goes unanswered.

use std::sync::Arc;

use shared_bus::{InMemoryEventBus, QueryBus, ResponderHandle, SocialEvent};
use sm_01_users::{serve_user_queries, BusSocialGraph, InMemoryUserRepository, UserService};
use sm_02_social::{serve_social_queries, BusUserDirectory, InMemorySocialRepository, SocialService};
use sm_03_activities::{ActivityService, BusFriendGraph, InMemoryActivityRepository};
use tracing::info;

use crate::container::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::handlers::NotificationCenter;

pub type ConcreteUserService = UserService<InMemoryUserRepository, BusSocialGraph>;

pub type ConcreteSocialService = SocialService<InMemorySocialRepository, BusUserDirectory>;

pub type ConcreteActivityService = ActivityService<
    InMemoryActivityRepository,
    sm_03_activities::BusUserDirectory,
    BusFriendGraph,
>;

/// Every module, wired.
pub struct ModuleContainer {
    pub config: RuntimeConfig,

    // =========================================================================
    // SHARED INFRASTRUCTURE
    // =========================================================================
    /// Request/response traffic between modules.
    pub queries: Arc<QueryBus>,
    /// Fire-and-forget domain events.
    pub events: Arc<InMemoryEventBus<SocialEvent>>,

    // =========================================================================
    // MODULES
    // =========================================================================
    pub users: Arc<ConcreteUserService>,
    pub social: Arc<ConcreteSocialService>,
    pub activities: Arc<ConcreteActivityService>,
    pub notifications: Arc<NotificationCenter>,

    responders: Vec<ResponderHandle>,
}

impl ModuleContainer {
    /// Build every module and register its responders. The query bus is
    /// not started yet.
    ///
    /// Must be called from within a Tokio runtime: responders are spawned.
    pub fn new(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;

        let queries = Arc::new(QueryBus::new(config.bus.clone())?);
        let events = Arc::new(InMemoryEventBus::with_capacity(config.bus.channel_capacity));

        let users = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(BusSocialGraph::new(&queries)),
            Arc::clone(&events),
        ));

        let social = Arc::new(SocialService::new(
            Arc::new(InMemorySocialRepository::new()),
            Arc::new(BusUserDirectory::new(&queries)),
            Arc::clone(&events),
        ));

        let activities = Arc::new(ActivityService::new(
            Arc::new(InMemoryActivityRepository::new()),
            Arc::new(sm_03_activities::BusUserDirectory::new(&queries)),
            Arc::new(BusFriendGraph::new(&queries)),
            Arc::clone(&events),
            config.activities.clone(),
        ));

        let notifications = Arc::new(NotificationCenter::new(&queries, &config.notifications));

        let mut responders = serve_user_queries(&queries, Arc::clone(&users));
        responders.extend(serve_social_queries(&queries, Arc::clone(&social)));
        info!(responders = responders.len(), "Modules wired");

        Ok(Self {
            config,
            queries,
            events,
            users,
            social,
            activities,
            notifications,
            responders,
        })
    }

    /// Query kinds with a registered responder.
    pub fn served_kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.responders.iter().map(|r| r.kind()).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Stop every responder. In-flight requests still get answered.
    pub(crate) fn stop_responders(&self) {
        for responder in &self.responders {
            responder.stop();
        }
    }
}
