//! Social Service
//!
//! Implements [`SocialApi`] over a repository and the user directory gateway.

use async_trait::async_trait;
use shared_bus::{EventPublisher, InMemoryEventBus, SocialEvent};
use shared_types::{UserId, UserPair};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{self, FriendRequest, FriendRequestId, RequestStatus};
use crate::error::SocialError;
use crate::ports::{SocialApi, SocialRepository, UserDirectory};

/// Social Service implementation
pub struct SocialService<R: SocialRepository, D: UserDirectory> {
    repo: Arc<R>,
    users: Arc<D>,
    events: Arc<InMemoryEventBus<SocialEvent>>,
}

impl<R: SocialRepository, D: UserDirectory> SocialService<R, D> {
    pub fn new(repo: Arc<R>, users: Arc<D>, events: Arc<InMemoryEventBus<SocialEvent>>) -> Self {
        Self {
            repo,
            users,
            events,
        }
    }

    /// Fail unless `user_id` resolves to an active user.
    async fn require_user(&self, user_id: UserId) -> Result<(), SocialError> {
        match self.users.get_user(user_id).await {
            Some(user) if user.active => Ok(()),
            _ => Err(SocialError::UnknownUser(user_id)),
        }
    }

    fn is_blocked(&self, a: UserId, b: UserId) -> bool {
        self.repo.blocks_involving(a).contains(&b)
    }

    fn pending_between(&self, from: UserId, to: UserId) -> Option<FriendRequest> {
        self.repo
            .requests_involving(from)
            .into_iter()
            .find(|r| r.is_pending() && r.from == from && r.to == to)
    }

    /// Store a new friendship and announce it. Returns whether it was new.
    async fn befriend(&self, a: UserId, b: UserId) -> bool {
        let created = self.repo.insert_friendship(UserPair::new(a, b));
        if created {
            info!(user_a = %a, user_b = %b, "Friendship created");
            self.events
                .publish(SocialEvent::FriendshipCreated { user_a: a, user_b: b })
                .await;
        }
        created
    }

    /// Answer a request on behalf of its recipient.
    fn answer(
        &self,
        request_id: FriendRequestId,
        acting_user: UserId,
        status: RequestStatus,
    ) -> Result<FriendRequest, SocialError> {
        let mut request = self
            .repo
            .get_request(request_id)
            .ok_or(SocialError::RequestNotFound(request_id))?;
        if request.to != acting_user {
            return Err(SocialError::NotRecipient);
        }
        request
            .answer(status)
            .map_err(SocialError::RequestNotPending)?;
        self.repo.save_request(request.clone());
        Ok(request)
    }
}

#[async_trait]
impl<R: SocialRepository, D: UserDirectory> SocialApi for SocialService<R, D> {
    async fn send_request(&self, from: UserId, to: UserId) -> Result<FriendRequest, SocialError> {
        if from == to {
            return Err(SocialError::SelfRelation);
        }
        if self.repo.has_friendship(UserPair::new(from, to)) {
            return Err(SocialError::AlreadyFriends);
        }
        if self.is_blocked(from, to) {
            return Err(SocialError::Blocked);
        }
        if self.pending_between(from, to).is_some() {
            return Err(SocialError::RequestAlreadyPending);
        }

        // A request the other way round turns this into an acceptance.
        if let Some(reverse) = self.pending_between(to, from) {
            debug!(request_id = %reverse.id, "Crossing friend requests, accepting");
            return self.accept_request(reverse.id, from).await;
        }

        self.require_user(from).await?;
        self.require_user(to).await?;

        let request = FriendRequest::new(from, to);
        self.repo.save_request(request.clone());
        info!(request_id = %request.id, from = %from, to = %to, "Friend request sent");
        self.events
            .publish(SocialEvent::FriendRequestSent { from, to })
            .await;

        Ok(request)
    }

    async fn accept_request(
        &self,
        request_id: FriendRequestId,
        acting_user: UserId,
    ) -> Result<FriendRequest, SocialError> {
        let request = self.answer(request_id, acting_user, RequestStatus::Accepted)?;
        // Recipient first: they are the one who just acted.
        self.befriend(request.to, request.from).await;
        Ok(request)
    }

    async fn decline_request(
        &self,
        request_id: FriendRequestId,
        acting_user: UserId,
    ) -> Result<FriendRequest, SocialError> {
        let request = self.answer(request_id, acting_user, RequestStatus::Declined)?;
        debug!(request_id = %request_id, "Friend request declined");
        Ok(request)
    }

    async fn save_friendship(&self, a: UserId, b: UserId) -> Result<bool, SocialError> {
        if a == b {
            return Err(SocialError::SelfRelation);
        }
        if self.is_blocked(a, b) {
            return Err(SocialError::Blocked);
        }
        let created = self.befriend(a, b).await;
        // Whatever was pending between them is settled now.
        self.repo.remove_requests(UserPair::new(a, b));
        Ok(created)
    }

    fn remove_friend(&self, a: UserId, b: UserId) -> bool {
        self.repo.remove_friendship(UserPair::new(a, b))
    }

    fn block(&self, blocker: UserId, blocked: UserId) -> Result<(), SocialError> {
        if blocker == blocked {
            return Err(SocialError::SelfRelation);
        }
        let pair = UserPair::new(blocker, blocked);
        self.repo.insert_block(blocker, blocked);
        let unfriended = self.repo.remove_friendship(pair);
        let dropped = self.repo.remove_requests(pair);
        info!(
            blocker = %blocker,
            blocked = %blocked,
            unfriended = unfriended,
            dropped_requests = dropped,
            "User blocked"
        );
        Ok(())
    }

    fn unblock(&self, blocker: UserId, blocked: UserId) -> bool {
        self.repo.remove_block(blocker, blocked)
    }

    fn are_friends(&self, a: UserId, b: UserId) -> bool {
        a != b && self.repo.has_friendship(UserPair::new(a, b))
    }

    fn friends_of(&self, user: UserId) -> HashSet<UserId> {
        self.repo.friends_of(user)
    }

    fn mutual_friend_count(&self, a: UserId, b: UserId) -> u32 {
        domain::mutual_count(&self.repo.friends_of(a), &self.repo.friends_of(b))
    }

    fn excluded_ids(&self, user: UserId) -> HashSet<UserId> {
        domain::excluded_ids(
            user,
            &self.repo.friends_of(user),
            &self.repo.requests_involving(user),
            &self.repo.blocks_involving(user),
        )
    }

    fn incoming_requests(&self, user: UserId) -> Vec<FriendRequest> {
        let mut incoming: Vec<_> = self
            .repo
            .requests_involving(user)
            .into_iter()
            .filter(|r| r.to == user && r.is_pending())
            .collect();
        incoming.sort_by_key(|r| r.created_at);
        incoming
    }
}
