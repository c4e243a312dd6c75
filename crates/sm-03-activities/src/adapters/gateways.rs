//! User and Social gateways over the query bus.

use async_trait::async_trait;
use shared_bus::query::{GetUserRequest, IsFriendRequest};
use shared_bus::{ModuleId, QueryBus, QueryClient};
use shared_types::{UserId, UserSummary};

use crate::ports::{FriendGraph, UserDirectory};

/// [`UserDirectory`] backed by `GetUser` queries.
#[derive(Clone)]
pub struct BusUserDirectory {
    client: QueryClient<GetUserRequest>,
}

impl BusUserDirectory {
    pub fn new(bus: &QueryBus) -> Self {
        Self {
            client: bus.client(ModuleId::Activities),
        }
    }
}

#[async_trait]
impl UserDirectory for BusUserDirectory {
    async fn get_user(&self, user_id: UserId) -> Option<UserSummary> {
        self.client.ask(GetUserRequest { user_id }).await.user
    }
}

/// [`FriendGraph`] backed by `IsFriend` queries.
#[derive(Clone)]
pub struct BusFriendGraph {
    client: QueryClient<IsFriendRequest>,
}

impl BusFriendGraph {
    pub fn new(bus: &QueryBus) -> Self {
        Self {
            client: bus.client(ModuleId::Activities),
        }
    }
}

#[async_trait]
impl FriendGraph for BusFriendGraph {
    async fn are_friends(&self, a: UserId, b: UserId) -> bool {
        self.client
            .ask(IsFriendRequest { user_a: a, user_b: b })
            .await
            .are_friends
    }
}
