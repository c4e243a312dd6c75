//! # Query Bus Properties
//!
//! The bus seen from outside: correlation isolation under fan-out, bounded
//! waits, handler-failure containment, exactly-once completion and registry
//! cleanup.

#[cfg(test)]
mod tests {
    use futures::future::join_all;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use shared_bus::query::{
        CorrelationRegistry, ExcludedUserIdsRequest, ExcludedUserIdsResponse, IsFriendRequest,
        IsFriendResponse, MutualFriendCountRequest, MutualFriendCountResponse, QueryStats,
        SearchUsersRequest,
    };
    use shared_bus::{
        handler_fn, CorrelationId, HandlerError, ModuleId, QueryBus, QueryBusConfig, QueryKind,
    };
    use shared_types::UserId;

    fn started(config: QueryBusConfig) -> QueryBus {
        let bus = QueryBus::new(config).unwrap();
        bus.start();
        bus
    }

    // =========================================================================
    // ROUND TRIPS
    // =========================================================================

    #[tokio::test]
    async fn test_is_friend_answered_true() {
        let bus = started(QueryBusConfig::default());
        let _h = bus.serve(handler_fn(|_q: IsFriendRequest| async {
            Ok::<_, HandlerError>(IsFriendResponse { are_friends: true })
        }));

        let answer = bus
            .client::<IsFriendRequest>(ModuleId::Activities)
            .ask(IsFriendRequest {
                user_a: UserId::new(),
                user_b: UserId::new(),
            })
            .await;
        assert!(answer.are_friends);
    }

    #[tokio::test]
    async fn test_no_responder_falls_back_after_timeout() {
        let bus = started(
            QueryBusConfig::default().with_timeout(QueryKind::IsFriend, Duration::from_millis(100)),
        );

        let started_at = Instant::now();
        let answer = bus
            .ask(IsFriendRequest {
                user_a: UserId::new(),
                user_b: UserId::new(),
            })
            .await;
        let waited = started_at.elapsed();

        assert!(!answer.are_friends);
        assert!(waited >= Duration::from_millis(100));
        assert!(waited < Duration::from_secs(2), "waited {waited:?}");
        assert_eq!(bus.pending_total(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_fifty_concurrent_pairs_get_their_own_count() {
        let bus = Arc::new(started(QueryBusConfig::default()));
        // Each pair has its own count, so any cross-talk shows up.
        let pairs: Vec<_> = (0..50u32)
            .map(|i| ((UserId::new(), UserId::new()), 1000 + i))
            .collect();
        let counts: Arc<HashMap<(UserId, UserId), u32>> = Arc::new(pairs.iter().copied().collect());

        let table = Arc::clone(&counts);
        let _h = bus.serve(handler_fn(move |q: MutualFriendCountRequest| {
            let count = table.get(&(q.user_a, q.user_b)).copied().unwrap_or(0);
            async move {
                // Uneven latency so answers come back out of order.
                tokio::time::sleep(Duration::from_millis(u64::from(count % 7))).await;
                Ok::<_, HandlerError>(MutualFriendCountResponse { count })
            }
        }));

        let calls = pairs.iter().map(|&((user_a, user_b), expected)| {
            let bus = Arc::clone(&bus);
            tokio::spawn(async move {
                let answer = bus.ask(MutualFriendCountRequest { user_a, user_b }).await;
                (expected, answer.count)
            })
        });

        for result in join_all(calls).await {
            let (expected, count) = result.unwrap();
            assert_eq!(count, expected);
        }

        let stats = bus.lane::<MutualFriendCountRequest>().stats_snapshot();
        assert_eq!(stats.issued, 50);
        assert_eq!(stats.completed, 50);
        assert_eq!(stats.timeouts, 0);
        assert_eq!(bus.pending_total(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_burst_beyond_channel_capacity_loses_nothing() {
        let mut config =
            QueryBusConfig::default().with_timeout(QueryKind::MutualFriendCount, Duration::from_secs(2));
        config.channel_capacity = 8;
        let bus = started(config);
        let _h = bus.serve(handler_fn(|_q: MutualFriendCountRequest| async {
            Ok::<_, HandlerError>(MutualFriendCountResponse { count: 7 })
        }));

        let client = bus.client::<MutualFriendCountRequest>(ModuleId::Users);
        let answers = join_all((0..200).map(|_| {
            client.ask(MutualFriendCountRequest {
                user_a: UserId::new(),
                user_b: UserId::new(),
            })
        }))
        .await;

        assert_eq!(answers.iter().filter(|a| a.count == 7).count(), 200);
        let stats = bus.lane::<MutualFriendCountRequest>().stats_snapshot();
        assert_eq!(stats.completed, 200);
        assert_eq!(stats.timeouts, 0);
        assert_eq!(bus.pending_total(), 0);
    }

    // =========================================================================
    // FAILURE CONTAINMENT
    // =========================================================================

    #[tokio::test]
    async fn test_failing_handler_answers_empty_set_quickly() {
        let bus = started(QueryBusConfig::default().with_default_timeout(Duration::from_secs(5)));
        let _h = bus.serve(handler_fn(|_q: ExcludedUserIdsRequest| async {
            Err::<ExcludedUserIdsResponse, _>(HandlerError::internal("database unavailable"))
        }));

        let started_at = Instant::now();
        let answer = bus
            .ask(ExcludedUserIdsRequest {
                user_id: UserId::new(),
            })
            .await;

        assert!(answer.excluded_ids.is_empty());
        assert!(started_at.elapsed() < Duration::from_secs(1));
        let stats = bus.lane::<ExcludedUserIdsRequest>().stats_snapshot();
        assert_eq!(stats.handler_failures, 1);
        assert_eq!(stats.degraded_responses, 1);
        assert_eq!(stats.timeouts, 0);
    }

    #[tokio::test]
    async fn test_panicking_handler_does_not_kill_responder() {
        let bus = started(QueryBusConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let _h = bus.serve(handler_fn(move |_q: ExcludedUserIdsRequest| {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    panic!("first call explodes");
                }
                Ok::<_, HandlerError>(ExcludedUserIdsResponse {
                    excluded_ids: [UserId::new()].into(),
                })
            }
        }));

        let first = bus.ask(ExcludedUserIdsRequest { user_id: UserId::new() }).await;
        let second = bus.ask(ExcludedUserIdsRequest { user_id: UserId::new() }).await;
        assert!(first.excluded_ids.is_empty());
        assert_eq!(second.excluded_ids.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    // =========================================================================
    // EXACTLY-ONCE AND CLEANUP
    // =========================================================================

    #[tokio::test]
    async fn test_second_completion_is_a_no_op() {
        let stats = Arc::new(QueryStats::default());
        let registry = Arc::new(CorrelationRegistry::<u32>::new(QueryKind::MutualFriendCount, stats));
        let id = CorrelationId::new();
        let waiter = registry.register(id, Duration::from_secs(1)).unwrap();

        assert!(registry.complete(id, 7));
        assert!(!registry.complete(id, 8));
        assert_eq!(waiter.wait(Duration::from_secs(1)).await.unwrap(), 7);

        // After the wait is over the id is gone for good.
        assert!(!registry.complete(id, 9));
        assert_eq!(registry.pending_count(), 0);
        assert_eq!(registry.stats().late_responses, 2);
    }

    #[tokio::test]
    async fn test_no_leak_after_mixed_outcomes() {
        let bus = Arc::new(started(
            QueryBusConfig::default()
                .with_timeout(QueryKind::SearchUsers, Duration::from_millis(20)),
        ));
        let _h = bus.serve(handler_fn(|q: IsFriendRequest| async move {
            Ok::<_, HandlerError>(IsFriendResponse {
                are_friends: q.user_a < q.user_b,
            })
        }));

        // Answered is-friend queries interleaved with unanswered searches.
        let mut calls = Vec::new();
        for i in 0..40 {
            let bus = Arc::clone(&bus);
            calls.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    bus.ask(IsFriendRequest {
                        user_a: UserId::new(),
                        user_b: UserId::new(),
                    })
                    .await;
                } else {
                    bus.ask(SearchUsersRequest {
                        search_query: "nobody".into(),
                        requesting_user_id: UserId::new(),
                    })
                    .await;
                }
            }));
        }
        for call in join_all(calls).await {
            call.unwrap();
        }

        assert_eq!(bus.pending_total(), 0);
        assert_eq!(bus.lane::<SearchUsersRequest>().stats_snapshot().timeouts, 20);
        assert_eq!(bus.lane::<IsFriendRequest>().stats_snapshot().completed, 20);
    }

    #[tokio::test]
    async fn test_cancelled_ask_leaves_no_entry() {
        let bus = Arc::new(started(QueryBusConfig::default()));

        let asking = {
            let bus = Arc::clone(&bus);
            tokio::spawn(async move {
                bus.ask(IsFriendRequest {
                    user_a: UserId::new(),
                    user_b: UserId::new(),
                })
                .await
            })
        };
        while bus.pending_total() == 0 {
            tokio::task::yield_now().await;
        }

        asking.abort();
        let _ = asking.await;
        assert_eq!(bus.pending_total(), 0);
    }

    #[tokio::test]
    async fn test_late_answer_after_timeout_is_absorbed() {
        let bus = started(
            QueryBusConfig::default().with_timeout(QueryKind::IsFriend, Duration::from_millis(30)),
        );
        let _h = bus.serve(handler_fn(|_q: IsFriendRequest| async {
            tokio::time::sleep(Duration::from_millis(120)).await;
            Ok::<_, HandlerError>(IsFriendResponse { are_friends: true })
        }));

        let answer = bus
            .ask(IsFriendRequest {
                user_a: UserId::new(),
                user_b: UserId::new(),
            })
            .await;
        assert!(!answer.are_friends);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let stats = bus.lane::<IsFriendRequest>().stats_snapshot();
        assert_eq!(stats.timeouts, 1);
        assert_eq!(stats.late_responses, 1);
        assert_eq!(stats.completed, 0);
        assert_eq!(bus.pending_total(), 0);
    }
}
