//! Service layer: orchestration.

mod user_service;

pub use user_service::{UserService, MAX_SEARCH_RESULTS};
