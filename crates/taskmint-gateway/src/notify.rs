//! Transient user notifications.
//!
//! Writes announce their outcome here; whatever renders notifications
//! subscribes to the bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

const NOTIFICATION_BUFFER: usize = 64;

pub const EXPLORER_ACTION_LABEL: &str = "View on Explorer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub variant: NotificationVariant,
    pub description: String,
    pub action: Option<NotificationAction>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self::new(NotificationVariant::Success, description)
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new(NotificationVariant::Error, description)
    }

    fn new(variant: NotificationVariant, description: impl Into<String>) -> Self {
        Self {
            variant,
            description: description.into(),
            action: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_action(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.action = Some(NotificationAction {
            label: label.into(),
            url: url.into(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.variant == NotificationVariant::Error
    }
}

/// Broadcast bus for [`Notification`]s. Cloning shares the bus.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
    emitted: Arc<AtomicU64>,
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTIFICATION_BUFFER);
        Self {
            sender,
            emitted: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn notify(&self, notification: Notification) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
        match self.sender.send(notification) {
            Ok(subscribers) => {
                debug!(subscribers, "Notification emitted");
            }
            Err(broadcast::error::SendError(notification)) => {
                // nobody listening is normal for headless use
                debug!(
                    description = %notification.description,
                    "Notification emitted but no subscribers listening"
                );
            }
        }
    }

    pub fn success(&self, description: impl Into<String>) {
        self.notify(Notification::success(description));
    }

    pub fn error(&self, description: impl Into<String>) {
        self.notify(Notification::error(description));
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn total_emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscriber_count())
            .field("emitted", &self.total_emitted())
            .finish()
    }
}
