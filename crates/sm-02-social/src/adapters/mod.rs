//! Adapters layer: storage, bus gateways and query responders.

mod memory;
mod query_handlers;
mod user_gateway;

pub use memory::InMemorySocialRepository;
pub use query_handlers::{
    serve_social_queries, ExcludedUserIdsHandler, IsFriendHandler, MutualFriendCountHandler,
    SaveFriendshipHandler,
};
pub use user_gateway::BusUserDirectory;
