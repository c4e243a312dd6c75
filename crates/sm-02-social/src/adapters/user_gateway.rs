//! User directory gateway over the query bus.

use async_trait::async_trait;
use shared_bus::query::GetUserRequest;
use shared_bus::{ModuleId, QueryBus, QueryClient};
use shared_types::{UserId, UserSummary};

use crate::ports::UserDirectory;

/// [`UserDirectory`] backed by `GetUser` queries.
#[derive(Clone)]
pub struct BusUserDirectory {
    client: QueryClient<GetUserRequest>,
}

impl BusUserDirectory {
    pub fn new(bus: &QueryBus) -> Self {
        Self {
            client: bus.client(ModuleId::Social),
        }
    }
}

#[async_trait]
impl UserDirectory for BusUserDirectory {
    async fn get_user(&self, user_id: UserId) -> Option<UserSummary> {
        self.client.ask(GetUserRequest { user_id }).await.user
    }
}
