//! Ports layer: trait definitions.

mod inbound;
mod outbound;

pub use inbound::ActivityApi;
pub use outbound::{ActivityRepository, FriendGraph, UserDirectory};
