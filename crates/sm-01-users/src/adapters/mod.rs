//! Adapters layer: storage, bus gateways and query responders.

mod memory;
mod query_handlers;
mod social_gateway;

pub use memory::InMemoryUserRepository;
pub use query_handlers::{serve_user_queries, GetUserHandler, SearchUsersHandler};
pub use social_gateway::BusSocialGraph;
