//! User-facing notifications about watch activity and commit cycle outcomes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete, timestamped message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Sending half of the notification stream.
///
/// Every notification is also logged at debug level. Sending never blocks
/// and never fails: if nobody is listening the notification is only logged.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<Notification>>,
}

impl Notifier {
    /// Create a notifier and the receiver that observes it.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier that only logs.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn send(&self, level: NotificationLevel, message: impl Into<String>) {
        let notification = Notification::new(level, message);

        debug!(severity = %level, "{}", notification.message);

        if let Some(tx) = &self.tx {
            let _ = tx.send(notification);
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(NotificationLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.send(NotificationLevel::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.send(NotificationLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(NotificationLevel::Error, message);
    }
}
