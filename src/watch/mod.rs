//! Watching a work tree and committing its changes on a timer.

pub mod cycle;
pub mod feed;
pub mod notification;
pub mod session;

use std::path::PathBuf;
use std::time::Duration;

pub use cycle::{CommitCycle, CycleOutcome, REMOTE_NOT_CONFIGURED};
pub use feed::{ChangeEvent, FeedHandle, classify_event, is_ignored, start_feed};
pub use notification::{Notification, NotificationLevel, Notifier};
pub use session::{WatchSession, event_message};

/// Seconds between commit cycles unless configured otherwise.
pub const DEFAULT_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_REMOTE: &str = "origin";

/// Settings for one watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Work-tree root being watched.
    pub root: PathBuf,
    /// Time between commit cycles.
    pub interval: Duration,
    /// Branch commits land on and are pushed to.
    pub branch: String,
    /// Name of the remote to push to.
    pub remote: String,
}

impl WatchConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            branch: DEFAULT_BRANCH.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
        }
    }
}
