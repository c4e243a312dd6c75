//! Domain layer: pure business logic, no I/O.

mod recommendation;
mod user;

pub use recommendation::{rank, Recommendation};
pub use user::{normalize_search, User, MAX_DISPLAY_NAME_LEN, MAX_USERNAME_LEN};
