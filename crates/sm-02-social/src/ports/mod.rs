//! Ports layer: trait definitions.

mod inbound;
mod outbound;

pub use inbound::SocialApi;
pub use outbound::{SocialRepository, UserDirectory};
