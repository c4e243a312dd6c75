//! # Notifications
//!
//! Turns domain events into human-readable entries in per-user inboxes.
//! Names are resolved with `GetUser` queries; an unanswered lookup degrades
//! to a generic name rather than dropping the notification.

use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use shared_bus::query::GetUserRequest;
use shared_bus::{BusEvent, ModuleId, QueryBus, QueryClient, SocialEvent, Subscription};
use shared_types::{Timestamp, UserId, Visibility};
use social_telemetry::log_event;
use social_telemetry::metrics::{EVENTS_PUBLISHED, NOTIFICATIONS_DELIVERED, NOTIFICATION_INBOXES};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::warn;

use crate::container::NotificationConfig;

/// One inbox entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient: UserId,
    /// Label of the event that caused it.
    pub event: &'static str,
    pub message: String,
    pub created_at: Timestamp,
}

/// Per-user inboxes, bounded.
pub struct NotificationCenter {
    inboxes: DashMap<UserId, VecDeque<Notification>>,
    max_inbox_len: usize,
    users: QueryClient<GetUserRequest>,
}

impl NotificationCenter {
    pub fn new(bus: &QueryBus, config: &NotificationConfig) -> Self {
        Self {
            inboxes: DashMap::new(),
            max_inbox_len: config.max_inbox_len,
            users: bus.client(ModuleId::Runtime),
        }
    }

    /// Deliver whatever `event` means for its recipients. Returns how many
    /// entries were written.
    pub async fn handle(&self, event: &SocialEvent) -> usize {
        let entries = match event {
            SocialEvent::UserRegistered { user } => {
                vec![(user.id, format!("Welcome to Social-Mesh, {}!", user.display_name))]
            }
            SocialEvent::FriendRequestSent { from, to } => {
                let name = self.display_name(*from).await;
                vec![(*to, format!("{name} sent you a friend request"))]
            }
            SocialEvent::FriendshipCreated { user_a, user_b } => {
                let (name_a, name_b) =
                    tokio::join!(self.display_name(*user_a), self.display_name(*user_b));
                vec![
                    (*user_a, format!("You and {name_b} are now friends")),
                    (*user_b, format!("You and {name_a} are now friends")),
                ]
            }
            SocialEvent::ActivityCreated {
                host_id,
                title,
                visibility,
                ..
            } => {
                let audience = match visibility {
                    Visibility::Public => "everyone",
                    Visibility::FriendsOnly => "your friends",
                };
                vec![(*host_id, format!("\"{title}\" is now visible to {audience}"))]
            }
            SocialEvent::ActivityJoined {
                host_id,
                participant_id,
                ..
            } => {
                let name = self.display_name(*participant_id).await;
                vec![(*host_id, format!("{name} joined your activity"))]
            }
        };

        let delivered = entries.len();
        for (recipient, message) in entries {
            self.push(Notification {
                recipient,
                event: event.label(),
                message,
                created_at: Utc::now(),
            });
        }
        delivered
    }

    fn push(&self, notification: Notification) {
        let recipient = notification.recipient;
        let mut inbox = self.inboxes.entry(recipient).or_default();
        inbox.push_back(notification);
        while inbox.len() > self.max_inbox_len {
            inbox.pop_front();
        }
        drop(inbox);

        NOTIFICATIONS_DELIVERED.inc();
        NOTIFICATION_INBOXES.set(i64::try_from(self.inboxes.len()).unwrap_or(i64::MAX));
        log_event!(debug, "runtime", "Notification delivered", recipient = %recipient);
    }

    async fn display_name(&self, user_id: UserId) -> String {
        match self.users.ask(GetUserRequest { user_id }).await.user {
            Some(user) => user.display_name,
            None => "Someone".to_string(),
        }
    }

    /// Entries for `user`, oldest first.
    pub fn inbox(&self, user: UserId) -> Vec<Notification> {
        self.inboxes
            .get(&user)
            .map(|inbox| inbox.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Take every entry for `user`.
    pub fn drain(&self, user: UserId) -> Vec<Notification> {
        let drained: Vec<_> = self
            .inboxes
            .remove(&user)
            .map(|(_, inbox)| inbox.into_iter().collect())
            .unwrap_or_default();
        NOTIFICATION_INBOXES.set(i64::try_from(self.inboxes.len()).unwrap_or(i64::MAX));
        drained
    }

    /// Entries across every inbox.
    pub fn total(&self) -> usize {
        self.inboxes.iter().map(|inbox| inbox.len()).sum()
    }
}

/// Feed every event from `subscription` into `center` until the bus closes.
pub async fn run_notifications(center: Arc<NotificationCenter>, mut subscription: Subscription<SocialEvent>) {
    log_event!(info, "runtime", "Notification handler started");

    while let Some(event) = subscription.recv().await {
        EVENTS_PUBLISHED
            .with_label_values(&[event.label(), event.source().as_str()])
            .inc();
        center.handle(&event).await;
    }

    warn!("Event bus closed, notification handler stopping");
}
