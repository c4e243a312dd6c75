//! Domain layer: pure business logic, no I/O.

mod graph;
mod request;

pub use graph::{excluded_ids, mutual_count};
pub use request::{FriendRequest, FriendRequestId, RequestStatus};
