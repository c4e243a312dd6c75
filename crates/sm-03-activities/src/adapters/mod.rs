//! Adapters layer: storage and bus gateways.

mod gateways;
mod memory;

pub use gateways::{BusFriendGraph, BusUserDirectory};
pub use memory::InMemoryActivityRepository;
