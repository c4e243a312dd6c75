//! User Service
//!
//! Implements [`UserApi`] over a repository and the social graph gateway.

use async_trait::async_trait;
use futures::future::join_all;
use shared_bus::{EventPublisher, InMemoryEventBus, SocialEvent};
use shared_types::{UserId, UserSummary};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{normalize_search, rank, Recommendation, User};
use crate::error::UserError;
use crate::ports::{SocialGraph, UserApi, UserRepository};

/// Cap on search results.
pub const MAX_SEARCH_RESULTS: usize = 50;

/// User Service implementation
pub struct UserService<R: UserRepository, G: SocialGraph> {
    repo: Arc<R>,
    graph: Arc<G>,
    events: Arc<InMemoryEventBus<SocialEvent>>,
}

impl<R: UserRepository, G: SocialGraph> UserService<R, G> {
    pub fn new(repo: Arc<R>, graph: Arc<G>, events: Arc<InMemoryEventBus<SocialEvent>>) -> Self {
        Self { repo, graph, events }
    }

    fn active_user(&self, user_id: UserId) -> Result<User, UserError> {
        let user = self.repo.get(user_id).ok_or(UserError::NotFound(user_id))?;
        if !user.active {
            return Err(UserError::Inactive(user_id));
        }
        Ok(user)
    }
}

#[async_trait]
impl<R: UserRepository, G: SocialGraph> UserApi for UserService<R, G> {
    async fn register(&self, username: &str, display_name: &str) -> Result<UserSummary, UserError> {
        let user = User::new(username, display_name)?;
        let summary = user.summary();
        self.repo.insert(user)?;

        info!(user_id = %summary.id, username = %summary.username, "User registered");
        self.events
            .publish(SocialEvent::UserRegistered {
                user: summary.clone(),
            })
            .await;

        Ok(summary)
    }

    fn get_user(&self, user_id: UserId) -> Result<UserSummary, UserError> {
        self.repo
            .get(user_id)
            .map(|u| u.summary())
            .ok_or(UserError::NotFound(user_id))
    }

    fn search(&self, query: &str, requester: UserId) -> Vec<UserSummary> {
        let Some(needle) = normalize_search(query) else {
            return Vec::new();
        };

        let mut hits: Vec<UserSummary> = self
            .repo
            .all()
            .into_iter()
            .filter(|u| u.active && u.id != requester && u.matches(&needle))
            .map(|u| u.summary())
            .collect();
        hits.sort_by(|a, b| a.username.cmp(&b.username));
        hits.truncate(MAX_SEARCH_RESULTS);

        debug!(query = %needle, hits = hits.len(), "User search");
        hits
    }

    async fn deactivate(&self, user_id: UserId) -> Result<UserSummary, UserError> {
        let mut user = self.repo.get(user_id).ok_or(UserError::NotFound(user_id))?;
        user.active = false;
        let summary = user.summary();
        self.repo.update(user)?;
        info!(user_id = %user_id, "User deactivated");
        Ok(summary)
    }

    async fn recommend(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Recommendation>, UserError> {
        self.active_user(user_id)?;

        let excluded: HashSet<UserId> = self.graph.excluded_ids(user_id).await;
        let candidates: Vec<UserSummary> = self
            .repo
            .all()
            .into_iter()
            .filter(|u| u.active && u.id != user_id && !excluded.contains(&u.id))
            .map(|u| u.summary())
            .collect();

        // One query per candidate, all in flight at once.
        let counts = join_all(
            candidates
                .iter()
                .map(|c| self.graph.mutual_friend_count(user_id, c.id)),
        )
        .await;

        let mut ranked = rank(
            candidates
                .into_iter()
                .zip(counts)
                .map(|(user, mutual_friends)| Recommendation {
                    user,
                    mutual_friends,
                })
                .collect(),
        );
        ranked.truncate(limit);

        debug!(
            user_id = %user_id,
            excluded = excluded.len(),
            returned = ranked.len(),
            "Computed recommendations"
        );
        Ok(ranked)
    }
}
