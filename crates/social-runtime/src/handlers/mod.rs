//! Background handlers owned by the runtime.

pub mod janitor;
pub mod notifications;

pub use janitor::{cleanup_task, sweep, SweepReport};
pub use notifications::{run_notifications, Notification, NotificationCenter};
