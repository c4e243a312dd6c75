//! Query responders for the kinds the User module owns.

use async_trait::async_trait;
use shared_bus::query::{GetUserRequest, GetUserResponse, SearchUsersRequest, SearchUsersResponse};
use shared_bus::{HandlerError, QueryBus, QueryHandler, ResponderHandle};
use std::sync::Arc;
use tracing::debug;

use crate::error::UserError;
use crate::ports::UserApi;

/// Answers `GetUser`. Unknown ids are a normal "not found" answer.
pub struct GetUserHandler<S: UserApi> {
    service: Arc<S>,
}

impl<S: UserApi> GetUserHandler<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: UserApi + 'static> QueryHandler<GetUserRequest> for GetUserHandler<S> {
    async fn handle(&self, query: GetUserRequest) -> Result<GetUserResponse, HandlerError> {
        match self.service.get_user(query.user_id) {
            Ok(user) => Ok(GetUserResponse { user: Some(user) }),
            Err(UserError::NotFound(id)) => {
                debug!(user_id = %id, "GetUser for unknown user");
                Ok(GetUserResponse { user: None })
            }
            Err(e) => Err(HandlerError::internal(e.to_string())),
        }
    }
}

/// Answers `SearchUsers`.
pub struct SearchUsersHandler<S: UserApi> {
    service: Arc<S>,
}

impl<S: UserApi> SearchUsersHandler<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: UserApi + 'static> QueryHandler<SearchUsersRequest> for SearchUsersHandler<S> {
    async fn handle(&self, query: SearchUsersRequest) -> Result<SearchUsersResponse, HandlerError> {
        let users = self
            .service
            .search(&query.search_query, query.requesting_user_id);
        Ok(SearchUsersResponse { users })
    }
}

/// Register every User-owned responder on `bus`.
pub fn serve_user_queries<S: UserApi + 'static>(
    bus: &QueryBus,
    service: Arc<S>,
) -> Vec<ResponderHandle> {
    vec![
        bus.serve(GetUserHandler::new(Arc::clone(&service))),
        bus.serve(SearchUsersHandler::new(service)),
    ]
}
