//! Query responders for the kinds the Social module owns.

use async_trait::async_trait;
use shared_bus::query::{
    ExcludedUserIdsRequest, ExcludedUserIdsResponse, IsFriendRequest, IsFriendResponse,
    MutualFriendCountRequest, MutualFriendCountResponse, SaveFriendshipRequest,
    SaveFriendshipResponse,
};
use shared_bus::{HandlerError, QueryBus, QueryHandler, ResponderHandle};
use std::sync::Arc;
use tracing::warn;

use crate::ports::SocialApi;

/// Answers `IsFriend`.
pub struct IsFriendHandler<S: SocialApi> {
    service: Arc<S>,
}

impl<S: SocialApi> IsFriendHandler<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: SocialApi + 'static> QueryHandler<IsFriendRequest> for IsFriendHandler<S> {
    async fn handle(&self, query: IsFriendRequest) -> Result<IsFriendResponse, HandlerError> {
        Ok(IsFriendResponse {
            are_friends: self.service.are_friends(query.user_a, query.user_b),
        })
    }
}

/// Answers `MutualFriendCount`.
pub struct MutualFriendCountHandler<S: SocialApi> {
    service: Arc<S>,
}

impl<S: SocialApi> MutualFriendCountHandler<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: SocialApi + 'static> QueryHandler<MutualFriendCountRequest>
    for MutualFriendCountHandler<S>
{
    async fn handle(
        &self,
        query: MutualFriendCountRequest,
    ) -> Result<MutualFriendCountResponse, HandlerError> {
        Ok(MutualFriendCountResponse {
            count: self.service.mutual_friend_count(query.user_a, query.user_b),
        })
    }
}

/// Answers `SaveFriendship`.
///
/// A rejected save is a normal `success: false` answer; re-saving an
/// existing friendship counts as success.
pub struct SaveFriendshipHandler<S: SocialApi> {
    service: Arc<S>,
}

impl<S: SocialApi> SaveFriendshipHandler<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: SocialApi + 'static> QueryHandler<SaveFriendshipRequest> for SaveFriendshipHandler<S> {
    async fn handle(
        &self,
        query: SaveFriendshipRequest,
    ) -> Result<SaveFriendshipResponse, HandlerError> {
        let success = match self.service.save_friendship(query.user_a, query.user_b).await {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    user_a = %query.user_a,
                    user_b = %query.user_b,
                    error = %e,
                    "SaveFriendship rejected"
                );
                false
            }
        };
        Ok(SaveFriendshipResponse { success })
    }
}

/// Answers `ExcludedUserIds`.
pub struct ExcludedUserIdsHandler<S: SocialApi> {
    service: Arc<S>,
}

impl<S: SocialApi> ExcludedUserIdsHandler<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: SocialApi + 'static> QueryHandler<ExcludedUserIdsRequest> for ExcludedUserIdsHandler<S> {
    async fn handle(
        &self,
        query: ExcludedUserIdsRequest,
    ) -> Result<ExcludedUserIdsResponse, HandlerError> {
        Ok(ExcludedUserIdsResponse {
            excluded_ids: self.service.excluded_ids(query.user_id),
        })
    }
}

/// Register every Social-owned responder on `bus`.
pub fn serve_social_queries<S: SocialApi + 'static>(
    bus: &QueryBus,
    service: Arc<S>,
) -> Vec<ResponderHandle> {
    vec![
        bus.serve(IsFriendHandler::new(Arc::clone(&service))),
        bus.serve(MutualFriendCountHandler::new(Arc::clone(&service))),
        bus.serve(SaveFriendshipHandler::new(Arc::clone(&service))),
        bus.serve(ExcludedUserIdsHandler::new(service)),
    ]
}
