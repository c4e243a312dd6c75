//! Domain layer: pure business logic, no I/O.

mod activity;
mod config;

pub use activity::{Activity, NewActivity, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
pub use config::ActivityConfig;
