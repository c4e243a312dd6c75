//! # Cross-Module Flows
//!
//! Full runtime, real modules. Every interaction between modules below
//! travels over the query bus or the event bus.
//!
//! ## Flows Tested
//!
//! 1. **Friend request → friendship**: Social asks Users for both parties
//! 2. **Recommendations**: Users asks Social for exclusions and mutual counts
//! 3. **Friends-only activities**: Activities asks Social `IsFriend`
//! 4. **Notifications**: the runtime turns events into inbox entries, asking
//!    Users for display names

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};
    use shared_bus::query::{MutualFriendCountRequest, SaveFriendshipRequest, SearchUsersRequest};
    use shared_bus::ModuleId;
    use shared_types::{UserSummary, Visibility};
    use sm_01_users::UserApi;
    use sm_02_social::{SocialApi, SocialError};
    use sm_03_activities::{ActivityApi, ActivityError, NewActivity};
    use social_runtime::{RuntimeConfig, SocialRuntime};

    use crate::integration::support::{eventually, started_runtime, started_with};

    async fn register(runtime: &SocialRuntime, names: &[&str]) -> Vec<UserSummary> {
        let users = &runtime.container().users;
        let mut registered = Vec::new();
        for name in names {
            registered.push(users.register(&name.to_lowercase(), name).await.unwrap());
        }
        registered
    }

    async fn befriend(runtime: &SocialRuntime, a: &UserSummary, b: &UserSummary) {
        let social = &runtime.container().social;
        let request = social.send_request(a.id, b.id).await.unwrap();
        social.accept_request(request.id, b.id).await.unwrap();
    }

    fn activity(title: &str, visibility: Visibility) -> NewActivity {
        NewActivity {
            title: title.into(),
            description: String::new(),
            visibility,
            capacity: 5,
            expires_at: Utc::now() + ChronoDuration::hours(3),
        }
    }

    // =========================================================================
    // SOCIAL GRAPH
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_friend_request_flow() {
        let runtime = started_runtime();
        let container = runtime.container();
        let users = register(&runtime, &["Ann", "Bob"]).await;
        let (ann, bob) = (&users[0], &users[1]);

        befriend(&runtime, ann, bob).await;
        assert!(container.social.are_friends(ann.id, bob.id));
        assert_eq!(
            container.social.send_request(bob.id, ann.id).await,
            Err(SocialError::AlreadyFriends)
        );

        // Unknown recipients are only discovered through GetUser.
        let ghost = shared_types::UserId::new();
        assert_eq!(
            container.social.send_request(ann.id, ghost).await,
            Err(SocialError::UnknownUser(ghost))
        );

        runtime.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_deactivated_user_cannot_be_requested() {
        let runtime = started_runtime();
        let container = runtime.container();
        let users = register(&runtime, &["Cleo", "Dev"]).await;

        container.users.deactivate(users[1].id).await.unwrap();
        assert_eq!(
            container.social.send_request(users[0].id, users[1].id).await,
            Err(SocialError::UnknownUser(users[1].id))
        );

        runtime.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_save_friendship_from_another_module() {
        let runtime = started_runtime();
        let container = runtime.container();
        let users = register(&runtime, &["Eve", "Finn"]).await;

        let client = container
            .queries
            .client::<SaveFriendshipRequest>(ModuleId::Activities);
        let answer = client
            .ask(SaveFriendshipRequest {
                user_a: users[0].id,
                user_b: users[1].id,
            })
            .await;

        assert!(answer.success);
        assert!(container.social.are_friends(users[1].id, users[0].id));
        runtime.shutdown().await;
    }

    // =========================================================================
    // USERS
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_recommendations_exclude_friends_and_rank_by_mutuals() {
        let runtime = started_runtime();
        let container = runtime.container();
        let users = register(&runtime, &["Alice", "Bob", "Carol", "Dave", "Erin", "Gus"]).await;
        let (alice, bob, carol, dave, erin, gus) =
            (&users[0], &users[1], &users[2], &users[3], &users[4], &users[5]);

        befriend(&runtime, alice, bob).await;
        befriend(&runtime, alice, carol).await;
        befriend(&runtime, dave, bob).await;
        befriend(&runtime, dave, carol).await;
        befriend(&runtime, erin, bob).await;
        // Pending either way also excludes.
        container.social.send_request(gus.id, alice.id).await.unwrap();

        let names: Vec<_> = container
            .users
            .recommend(alice.id, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.user.username, r.mutual_friends))
            .collect();
        assert_eq!(names, [("dave".to_string(), 2), ("erin".to_string(), 1)]);

        runtime.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_recommendations_with_more_candidates_than_channel_capacity() {
        let mut config = RuntimeConfig::default();
        config.bus.channel_capacity = 4;
        let runtime = started_with(config);
        let container = runtime.container();

        let names: Vec<String> = (0..30).map(|i| format!("U{i:02}")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let users = register(&runtime, &name_refs).await;
        befriend(&runtime, &users[0], &users[1]).await;
        befriend(&runtime, &users[2], &users[1]).await;

        let recs = container.users.recommend(users[0].id, 50).await.unwrap();
        assert_eq!(recs.len(), 28);
        assert_eq!(recs[0].user.id, users[2].id);
        assert_eq!(recs[0].mutual_friends, 1);

        let stats = container.queries.lane::<MutualFriendCountRequest>().stats_snapshot();
        assert_eq!(stats.timeouts, 0);
        assert_eq!(stats.completed, 28);

        runtime.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_search_over_bus_excludes_requester() {
        let runtime = started_runtime();
        let container = runtime.container();
        let users = register(&runtime, &["Sam", "Samantha", "Bo"]).await;

        let found = container
            .queries
            .ask(SearchUsersRequest {
                search_query: "SAM".into(),
                requesting_user_id: users[0].id,
            })
            .await;
        let names: Vec<_> = found.users.into_iter().map(|u| u.username).collect();
        assert_eq!(names, ["samantha"]);

        runtime.shutdown().await;
    }

    // =========================================================================
    // ACTIVITIES
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_friends_only_activity_visibility() {
        let runtime = started_runtime();
        let container = runtime.container();
        let users = register(&runtime, &["Host", "Pal", "Stranger"]).await;
        let (host, pal, stranger) = (&users[0], &users[1], &users[2]);
        befriend(&runtime, host, pal).await;

        let open = container
            .activities
            .create(host.id, activity("Open mic", Visibility::Public))
            .await
            .unwrap();
        let closed = container
            .activities
            .create(host.id, activity("House party", Visibility::FriendsOnly))
            .await
            .unwrap();

        assert_eq!(container.activities.list_visible(pal.id).await.len(), 2);
        let seen: Vec<_> = container
            .activities
            .list_visible(stranger.id)
            .await
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(seen, [open.id]);

        assert_eq!(
            container.activities.join(closed.id, stranger.id).await,
            Err(ActivityError::NotVisible)
        );
        let joined = container.activities.join(closed.id, pal.id).await.unwrap();
        assert_eq!(joined.participants, [pal.id]);

        runtime.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unknown_host_cannot_create() {
        let runtime = started_runtime();
        let ghost = shared_types::UserId::new();

        let result = runtime
            .container()
            .activities
            .create(ghost, activity("Nothing", Visibility::Public))
            .await;
        assert_eq!(result, Err(ActivityError::UnknownUser(ghost)));

        runtime.shutdown().await;
    }

    // =========================================================================
    // NOTIFICATIONS
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_events_land_in_inboxes() {
        let runtime = started_runtime();
        let container = runtime.container();
        let users = register(&runtime, &["Iris", "Jon"]).await;
        let (iris, jon) = (&users[0], &users[1]);

        befriend(&runtime, iris, jon).await;
        let party = container
            .activities
            .create(iris.id, activity("Picnic", Visibility::Public))
            .await
            .unwrap();
        container.activities.join(party.id, jon.id).await.unwrap();

        let notifications = &container.notifications;
        let iris_inbox = eventually(move || async move {
            let inbox = notifications.inbox(iris.id);
            (inbox.len() >= 4).then_some(inbox)
        })
        .await;
        let messages: Vec<_> = iris_inbox.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Welcome to Social-Mesh, Iris!",
                "You and Jon are now friends",
                "\"Picnic\" is now visible to everyone",
                "Jon joined your activity",
            ]
        );

        let jon_inbox = eventually(move || async move {
            let inbox = notifications.inbox(jon.id);
            (inbox.len() >= 3).then_some(inbox)
        })
        .await;
        assert_eq!(jon_inbox[1].message, "Iris sent you a friend request");
        assert_eq!(jon_inbox[2].message, "You and Iris are now friends");

        runtime.shutdown().await;
    }
}
