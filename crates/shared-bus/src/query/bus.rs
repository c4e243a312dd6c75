//! The query bus: one typed lane per query kind behind a single handle.

use crate::events::ModuleId;
use crate::query::client::QueryClient;
use crate::query::config::QueryBusConfig;
use crate::query::error::{ConfigError, QueryError};
use crate::query::kinds::{
    ExcludedUserIdsRequest, GetUserRequest, IsFriendRequest, MutualFriendCountRequest,
    SaveFriendshipRequest, SearchUsersRequest,
};
use crate::query::lane::{LaneControl, QueryLane};
use crate::query::message::Query;
use crate::query::responder::{QueryHandler, ResponderHandle};
use crate::query::stats::QueryStatsSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Lookup of the lane carrying query kind `Q`.
///
/// Implemented for [`QueryBus`] once per kind; asking a kind the bus does
/// not carry is a compile error.
pub trait HasLane<Q: Query> {
    /// The lane for `Q`.
    fn lane(&self) -> &QueryLane<Q>;
}

/// Shared handle to every query lane.
pub struct QueryBus {
    config: QueryBusConfig,
    get_user: QueryLane<GetUserRequest>,
    is_friend: QueryLane<IsFriendRequest>,
    mutual_friend_count: QueryLane<MutualFriendCountRequest>,
    save_friendship: QueryLane<SaveFriendshipRequest>,
    excluded_user_ids: QueryLane<ExcludedUserIdsRequest>,
    search_users: QueryLane<SearchUsersRequest>,
}

macro_rules! lanes {
    ($($query:ty => $field:ident),* $(,)?) => {
        $(
            impl HasLane<$query> for QueryBus {
                fn lane(&self) -> &QueryLane<$query> {
                    &self.$field
                }
            }
        )*

        impl QueryBus {
            fn lanes(&self) -> Vec<&dyn LaneControl> {
                vec![$(&self.$field as &dyn LaneControl),*]
            }
        }
    };
}

lanes! {
    GetUserRequest => get_user,
    IsFriendRequest => is_friend,
    MutualFriendCountRequest => mutual_friend_count,
    SaveFriendshipRequest => save_friendship,
    ExcludedUserIdsRequest => excluded_user_ids,
    SearchUsersRequest => search_users,
}

impl QueryBus {
    /// Build every lane from `config`. Routers are subscribed but idle until
    /// [`start`](Self::start).
    pub fn new(config: QueryBusConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: QueryBusConfig) -> Self {
        fn lane<Q: Query>(config: &QueryBusConfig) -> QueryLane<Q> {
            QueryLane::new(config.timeout_for(Q::KIND), config.channel_capacity)
        }

        Self {
            get_user: lane(&config),
            is_friend: lane(&config),
            mutual_friend_count: lane(&config),
            save_friendship: lane(&config),
            excluded_user_ids: lane(&config),
            search_users: lane(&config),
            config,
        }
    }

    /// Spawn every lane's response router. Must run inside a tokio runtime.
    pub fn start(&self) {
        let started = self.lanes().into_iter().filter(|l| l.start()).count();
        info!(lanes = started, "Query bus started");
    }

    /// Stop every router and responder and release all pending waiters.
    ///
    /// Returns how many in-flight queries were abandoned.
    pub fn shutdown(&self) -> usize {
        let abandoned = self.lanes().into_iter().map(|l| l.shutdown()).sum();
        info!(abandoned = abandoned, "Query bus shut down");
        abandoned
    }

    /// A client for kind `Q` asking on behalf of `origin`.
    pub fn client<Q: Query>(&self, origin: ModuleId) -> QueryClient<Q>
    where
        Self: HasLane<Q>,
    {
        HasLane::<Q>::lane(self).client(origin)
    }

    /// Register `handler` as the responder for kind `Q`.
    pub fn serve<Q, H>(&self, handler: H) -> ResponderHandle
    where
        Q: Query,
        H: QueryHandler<Q>,
        Self: HasLane<Q>,
    {
        HasLane::<Q>::lane(self).serve(handler)
    }

    /// Register an already shared handler for kind `Q`.
    pub fn serve_shared<Q: Query>(&self, handler: Arc<dyn QueryHandler<Q>>) -> ResponderHandle
    where
        Self: HasLane<Q>,
    {
        HasLane::<Q>::lane(self).serve_shared(handler)
    }

    /// Ask on behalf of the runtime with the configured timeout.
    pub async fn ask<Q: Query>(&self, query: Q) -> Q::Response
    where
        Self: HasLane<Q>,
    {
        self.client::<Q>(ModuleId::Runtime).ask(query).await
    }

    /// Ask on behalf of the runtime with an explicit timeout.
    pub async fn ask_with_timeout<Q: Query>(&self, query: Q, timeout: Duration) -> Q::Response
    where
        Self: HasLane<Q>,
    {
        self.client::<Q>(ModuleId::Runtime)
            .ask_with_timeout(query, timeout)
            .await
    }

    /// Ask and report why no answer arrived.
    pub async fn try_ask<Q: Query>(&self, query: Q, timeout: Duration) -> Result<Q::Response, QueryError>
    where
        Self: HasLane<Q>,
    {
        self.client::<Q>(ModuleId::Runtime)
            .try_ask(query, timeout)
            .await
    }

    /// The lane for `Q`.
    pub fn lane<Q: Query>(&self) -> &QueryLane<Q>
    where
        Self: HasLane<Q>,
    {
        HasLane::<Q>::lane(self)
    }

    /// In-flight queries across every lane.
    pub fn pending_total(&self) -> usize {
        self.lanes().into_iter().map(|l| l.pending_count()).sum()
    }

    /// Sweep expired entries on every lane.
    pub fn remove_expired(&self) -> usize {
        self.lanes().into_iter().map(|l| l.remove_expired()).sum()
    }

    /// Counters for every lane, in [`QueryKind::ALL`](crate::QueryKind::ALL) order.
    pub fn stats_snapshots(&self) -> Vec<QueryStatsSnapshot> {
        let mut snapshots: Vec<_> = self.lanes().into_iter().map(|l| l.stats_snapshot()).collect();
        snapshots.sort_by_key(|s| s.kind);
        snapshots
    }

    /// Configuration the bus was built with.
    pub fn config(&self) -> &QueryBusConfig {
        &self.config
    }
}

impl Default for QueryBus {
    fn default() -> Self {
        Self::build(QueryBusConfig::default())
    }
}

impl std::fmt::Debug for QueryBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<_> = self.lanes().iter().map(|l| l.kind()).collect();
        f.debug_struct("QueryBus")
            .field("config", &self.config)
            .field("lanes", &kinds)
            .field("pending", &self.pending_total())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::error::HandlerError;
    use crate::query::kinds::{ExcludedUserIdsResponse, IsFriendResponse, MutualFriendCountResponse};
    use crate::query::message::QueryKind;
    use crate::query::responder::handler_fn;
    use shared_types::UserId;
    use std::collections::{HashMap, HashSet};
    use std::time::Instant;

    fn bus_with(config: QueryBusConfig) -> Arc<QueryBus> {
        let bus = Arc::new(QueryBus::new(config).unwrap());
        bus.start();
        bus
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = QueryBusConfig::default();
        config.channel_capacity = 0;
        assert!(QueryBus::new(config).is_err());
    }

    #[tokio::test]
    async fn test_is_friend_answered() {
        let bus = bus_with(QueryBusConfig::default());
        let _h = bus.serve(handler_fn(|_q: IsFriendRequest| async {
            Ok::<_, HandlerError>(IsFriendResponse { are_friends: true })
        }));

        let answer = bus
            .ask(IsFriendRequest {
                user_a: UserId::new(),
                user_b: UserId::new(),
            })
            .await;
        assert!(answer.are_friends);
        assert_eq!(bus.pending_total(), 0);
    }

    #[tokio::test]
    async fn test_no_responder_falls_back_after_timeout() {
        let config = QueryBusConfig::default().with_timeout(QueryKind::IsFriend, Duration::from_millis(100));
        let bus = bus_with(config);

        let started = Instant::now();
        let answer = bus
            .ask(IsFriendRequest {
                user_a: UserId::new(),
                user_b: UserId::new(),
            })
            .await;

        assert!(!answer.are_friends);
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert_eq!(bus.pending_total(), 0);

        let stats = bus.lane::<IsFriendRequest>().stats_snapshot();
        assert_eq!(stats.timeouts, 1);
        assert_eq!(stats.fallbacks, 1);
    }

    #[tokio::test]
    async fn test_handler_panic_answers_fallback_promptly() {
        let bus = bus_with(QueryBusConfig::default());
        let _h = bus.serve(handler_fn(|_q: ExcludedUserIdsRequest| async move {
            if true {
                panic!("storage exploded");
            }
            Ok::<_, HandlerError>(ExcludedUserIdsResponse {
                excluded_ids: HashSet::new(),
            })
        }));

        let started = Instant::now();
        let answer = bus
            .ask(ExcludedUserIdsRequest { user_id: UserId::new() })
            .await;

        assert!(answer.excluded_ids.is_empty());
        assert!(started.elapsed() < Duration::from_secs(1));

        let stats = bus.lane::<ExcludedUserIdsRequest>().stats_snapshot();
        assert_eq!(stats.handler_failures, 1);
        assert_eq!(stats.timeouts, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_queries_get_their_own_answers() {
        let bus = bus_with(QueryBusConfig::default());
        let pairs: Vec<_> = (0..50).map(|_| (UserId::new(), UserId::new())).collect();
        let counts: Arc<HashMap<_, u32>> =
            Arc::new(pairs.iter().copied().zip(0u32..).collect());

        let table = Arc::clone(&counts);
        let _h = bus.serve(handler_fn(move |q: MutualFriendCountRequest| {
            let count = table.get(&(q.user_a, q.user_b)).copied().unwrap_or(u32::MAX);
            async move { Ok::<_, HandlerError>(MutualFriendCountResponse { count }) }
        }));

        let mut tasks = Vec::new();
        for (index, (user_a, user_b)) in pairs.into_iter().enumerate() {
            let bus = Arc::clone(&bus);
            tasks.push(tokio::spawn(async move {
                let answer = bus.ask(MutualFriendCountRequest { user_a, user_b }).await;
                assert_eq!(answer.count as usize, index);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(bus.pending_total(), 0);
        let stats = bus.lane::<MutualFriendCountRequest>().stats_snapshot();
        assert_eq!(stats.completed, 50);
    }

    #[tokio::test]
    async fn test_nested_ask_inside_handler() {
        let bus = bus_with(QueryBusConfig::default());
        let _inner = bus.serve(handler_fn(|_q: IsFriendRequest| async {
            Ok::<_, HandlerError>(IsFriendResponse { are_friends: true })
        }));

        let outer_bus = Arc::clone(&bus);
        let _outer = bus.serve(handler_fn(move |q: MutualFriendCountRequest| {
            let bus = Arc::clone(&outer_bus);
            async move {
                let friends = bus
                    .ask(IsFriendRequest {
                        user_a: q.user_a,
                        user_b: q.user_b,
                    })
                    .await;
                Ok::<_, HandlerError>(MutualFriendCountResponse {
                    count: u32::from(friends.are_friends),
                })
            }
        }));

        let answer = bus
            .ask_with_timeout(
                MutualFriendCountRequest {
                    user_a: UserId::new(),
                    user_b: UserId::new(),
                },
                Duration::from_secs(1),
            )
            .await;
        assert_eq!(answer.count, 1);
    }

    #[tokio::test]
    async fn test_try_ask_reports_timeout() {
        let bus = bus_with(QueryBusConfig::default());
        let result = bus
            .try_ask(
                IsFriendRequest {
                    user_a: UserId::new(),
                    user_b: UserId::new(),
                },
                Duration::from_millis(20),
            )
            .await;
        assert!(matches!(result, Err(QueryError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_stats_snapshots_cover_every_kind() {
        let bus = QueryBus::default();
        let kinds: Vec<_> = bus.stats_snapshots().into_iter().map(|s| s.kind).collect();
        assert_eq!(kinds, QueryKind::ALL.to_vec());
    }
}
