//! # Degraded Operation
//!
//! Modules wired without the peers they ask. Every missing answer turns into
//! the query kind's fallback after a short timeout; nothing errors across a
//! module boundary and nothing hangs.

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use shared_bus::query::{GetUserRequest, GetUserResponse, IsFriendRequest, SaveFriendshipRequest};
    use shared_bus::{handler_fn, HandlerError, InMemoryEventBus, ModuleId, QueryBus, QueryBusConfig};
    use shared_types::{UserId, UserSummary, Visibility};
    use sm_01_users::{BusSocialGraph, InMemoryUserRepository, UserApi, UserService};
    use sm_02_social::{
        serve_social_queries, BusUserDirectory, InMemorySocialRepository, SocialApi, SocialError,
        SocialService,
    };
    use sm_03_activities::{
        ActivityApi, ActivityConfig, ActivityService, BusFriendGraph, InMemoryActivityRepository,
        NewActivity,
    };

    use crate::integration::support::started_runtime;

    const SHORT: Duration = Duration::from_millis(50);

    fn short_bus() -> Arc<QueryBus> {
        let bus = QueryBus::new(QueryBusConfig::default().with_default_timeout(SHORT)).unwrap();
        bus.start();
        Arc::new(bus)
    }

    #[tokio::test]
    async fn test_recommendations_without_social_module() {
        let bus = short_bus();
        let users = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(BusSocialGraph::new(&bus)),
            Arc::new(InMemoryEventBus::new()),
        );
        let me = users.register("me", "Me").await.unwrap();
        users.register("you", "You").await.unwrap();
        users.register("them", "Them").await.unwrap();

        let started_at = Instant::now();
        let recs = users.recommend(me.id, 10).await.unwrap();
        assert!(started_at.elapsed() < Duration::from_secs(2));

        let names: Vec<_> = recs.iter().map(|r| r.user.username.as_str()).collect();
        assert_eq!(names, ["them", "you"]);
        assert!(recs.iter().all(|r| r.mutual_friends == 0));
        assert_eq!(bus.pending_total(), 0);
    }

    #[tokio::test]
    async fn test_friend_request_without_user_module() {
        let bus = short_bus();
        let social = SocialService::new(
            Arc::new(InMemorySocialRepository::new()),
            Arc::new(BusUserDirectory::new(&bus)),
            Arc::new(InMemoryEventBus::new()),
        );
        let (a, b) = (UserId::new(), UserId::new());

        assert_eq!(
            social.send_request(a, b).await,
            Err(SocialError::UnknownUser(a))
        );
        assert!(social.incoming_requests(b).is_empty());
    }

    #[tokio::test]
    async fn test_activities_without_social_module_hide_friends_only() {
        let bus = short_bus();
        let host = UserId::new();
        let viewer = UserId::new();
        let _users = bus.serve(handler_fn(|q: GetUserRequest| async move {
            Ok::<_, HandlerError>(GetUserResponse {
                user: Some(UserSummary {
                    id: q.user_id,
                    username: q.user_id.to_string(),
                    display_name: "anyone".into(),
                    active: true,
                }),
            })
        }));

        let activities = ActivityService::new(
            Arc::new(InMemoryActivityRepository::new()),
            Arc::new(sm_03_activities::BusUserDirectory::new(&bus)),
            Arc::new(BusFriendGraph::new(&bus)),
            Arc::new(InMemoryEventBus::new()),
            ActivityConfig::default(),
        );
        for (title, visibility) in [("Public", Visibility::Public), ("Friends", Visibility::FriendsOnly)] {
            activities
                .create(
                    host,
                    NewActivity {
                        title: title.into(),
                        description: String::new(),
                        visibility,
                        capacity: 3,
                        expires_at: Utc::now() + ChronoDuration::hours(1),
                    },
                )
                .await
                .unwrap();
        }

        // The host never needs the Social module to see their own activities.
        assert_eq!(activities.list_visible(host).await.len(), 2);
        let seen: Vec<_> = activities
            .list_visible(viewer)
            .await
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(seen, ["Public"]);
        assert_eq!(bus.lane::<IsFriendRequest>().stats_snapshot().fallbacks, 1);
    }

    #[tokio::test]
    async fn test_nested_ask_from_real_handler() {
        let bus = Arc::new(QueryBus::default());
        bus.start();
        let social = Arc::new(SocialService::new(
            Arc::new(InMemorySocialRepository::new()),
            Arc::new(BusUserDirectory::new(&bus)),
            Arc::new(InMemoryEventBus::new()),
        ));
        let _social = serve_social_queries(&bus, Arc::clone(&social));

        let (a, b) = (UserId::new(), UserId::new());
        social.save_friendship(a, b).await.unwrap();

        // A GetUser responder that consults Social before answering.
        let inner = bus.client::<IsFriendRequest>(ModuleId::Users);
        let _users = bus.serve(handler_fn(move |q: GetUserRequest| {
            let inner = inner.clone();
            async move {
                let friends = inner
                    .ask(IsFriendRequest {
                        user_a: q.user_id,
                        user_b: b,
                    })
                    .await;
                Ok::<_, HandlerError>(GetUserResponse {
                    user: friends.are_friends.then(|| UserSummary {
                        id: q.user_id,
                        username: "friend-of-b".into(),
                        display_name: "Friend".into(),
                        active: true,
                    }),
                })
            }
        }));

        let answer = tokio::time::timeout(
            Duration::from_secs(1),
            bus.ask(GetUserRequest { user_id: a }),
        )
        .await
        .expect("nested ask must not deadlock");
        assert!(answer.found());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocked_save_friendship_is_a_plain_no() {
        let runtime = started_runtime();
        let container = runtime.container();
        let (a, b) = (UserId::new(), UserId::new());
        container.social.block(a, b).unwrap();

        let answer = container
            .queries
            .ask(SaveFriendshipRequest { user_a: b, user_b: a })
            .await;
        assert!(!answer.success);

        let stats = container
            .queries
            .lane::<SaveFriendshipRequest>()
            .stats_snapshot();
        assert_eq!(stats.handler_failures, 0);
        assert_eq!(stats.timeouts, 0);

        runtime.shutdown().await;
    }
}
