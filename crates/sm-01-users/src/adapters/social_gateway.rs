//! Social graph gateway
//!
//! Reaches the Social module through the query bus. The User module never
//! links against the Social crate.

use async_trait::async_trait;
use shared_bus::query::{ExcludedUserIdsRequest, MutualFriendCountRequest};
use shared_bus::{ModuleId, QueryBus, QueryClient};
use shared_types::UserId;
use std::collections::HashSet;

use crate::ports::SocialGraph;

/// [`SocialGraph`] backed by `ExcludedUserIds` and `MutualFriendCount` queries.
#[derive(Clone)]
pub struct BusSocialGraph {
    excluded: QueryClient<ExcludedUserIdsRequest>,
    mutual: QueryClient<MutualFriendCountRequest>,
}

impl BusSocialGraph {
    pub fn new(bus: &QueryBus) -> Self {
        Self {
            excluded: bus.client(ModuleId::Users),
            mutual: bus.client(ModuleId::Users),
        }
    }
}

#[async_trait]
impl SocialGraph for BusSocialGraph {
    async fn excluded_ids(&self, user_id: UserId) -> HashSet<UserId> {
        self.excluded
            .ask(ExcludedUserIdsRequest { user_id })
            .await
            .excluded_ids
    }

    async fn mutual_friend_count(&self, a: UserId, b: UserId) -> u32 {
        self.mutual
            .ask(MutualFriendCountRequest { user_a: a, user_b: b })
            .await
            .count
    }
}
