//! Ports layer: trait definitions.

mod inbound;
mod outbound;

pub use inbound::UserApi;
pub use outbound::{SocialGraph, UserRepository};
