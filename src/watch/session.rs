//! A running watch: change feed plus periodic commit timer.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::analysis::{ChangeKind, ContentSource, file_name};
use crate::error::WatchError;
use crate::git::VcsClient;
use crate::summary::SharedBatch;

use super::cycle::CommitCycle;
use super::feed::{ChangeEvent, FeedHandle, start_feed};
use super::notification::Notifier;

/// Owns the feed and the two background tasks of one watch.
pub struct WatchSession {
    feed: Option<FeedHandle>,
    shutdown: watch::Sender<bool>,
    consumer: JoinHandle<()>,
    timer: JoinHandle<()>,
}

impl WatchSession {
    /// Start watching `root`, running `cycle` once per `period`.
    ///
    /// `period` must be non-zero.
    pub fn start<V, S>(
        root: &Path,
        period: Duration,
        cycle: Arc<CommitCycle<V, S>>,
    ) -> Result<Self, WatchError>
    where
        V: VcsClient + 'static,
        S: ContentSource + Send + Sync + 'static,
    {
        if period.is_zero() {
            return Err(WatchError::ZeroInterval);
        }
        if !root.is_dir() {
            return Err(WatchError::NotADirectory(root.to_path_buf()));
        }

        let (feed, events) = start_feed(root)?;
        let (shutdown, shutdown_rx) = watch::channel(false);

        let consumer = tokio::spawn(consume_events(
            events,
            cycle.batch().clone(),
            cycle.notifier().clone(),
            shutdown_rx.clone(),
        ));
        let timer = tokio::spawn(run_timer(period, cycle, shutdown_rx));

        info!("Watching {} (commit every {}s)", root.display(), period.as_secs());

        Ok(Self {
            feed: Some(feed),
            shutdown,
            consumer,
            timer,
        })
    }

    /// Stop watching. An in-flight commit cycle is allowed to finish.
    pub async fn stop(mut self) {
        drop(self.feed.take());
        let _ = self.shutdown.send(true);
        let _ = self.consumer.await;
        let _ = self.timer.await;
        info!("Watch stopped");
    }
}

/// Message shown when the feed reports a change.
pub fn event_message(event: &ChangeEvent) -> String {
    let name = file_name(&event.path);
    match event.kind {
        ChangeKind::Added => format!("New file detected: {name}"),
        ChangeKind::Modified => format!("File changed: {name}"),
        ChangeKind::Deleted => format!("File deleted: {name}"),
    }
}

async fn consume_events(
    mut events: mpsc::Receiver<ChangeEvent>,
    batch: SharedBatch,
    notifier: Notifier,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                notifier.info(event_message(&event));
                batch.record(event.path, event.kind).await;
            }
        }
    }
    debug!("Change feed consumer exited");
}

async fn run_timer<V, S>(
    period: Duration,
    cycle: Arc<CommitCycle<V, S>>,
    mut shutdown: watch::Receiver<bool>,
) where
    V: VcsClient,
    S: ContentSource + Send + Sync,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                let outcome = cycle.run().await;
                debug!("Commit cycle finished: {:?}", outcome);
            }
        }
    }
    debug!("Commit timer exited");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use git2::Oid;
    use tokio::sync::Notify;

    use super::*;
    use crate::analysis::WorkingTree;
    use crate::error::GitError;
    use crate::git::client::MockVcsClient;
    use crate::watch::WatchConfig;
    use crate::watch::notification::NotificationLevel;

    /// A client whose commit takes a while, reporting when it starts and ends.
    struct SlowVcs {
        started: Arc<Notify>,
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl VcsClient for SlowVcs {
        async fn stage_and_commit(&self, _message: &str) -> Result<Oid, GitError> {
            self.started.notify_one();
            tokio::time::sleep(Duration::from_millis(300)).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(Oid::zero())
        }

        async fn has_remote(&self, _remote: &str) -> bool {
            false
        }

        async fn push(&self, _remote: &str, _branch: &str) -> Result<(), GitError> {
            Ok(())
        }
    }

    fn idle_cycle(root: &Path) -> Arc<CommitCycle<MockVcsClient, WorkingTree>> {
        let mut vcs = MockVcsClient::new();
        vcs.expect_stage_and_commit().never();
        vcs.expect_has_remote().never();
        vcs.expect_push().never();
        Arc::new(CommitCycle::new(
            vcs,
            WorkingTree,
            SharedBatch::new(),
            Notifier::disabled(),
            &WatchConfig::new(root),
        ))
    }

    #[test]
    fn test_event_messages() {
        assert_eq!(
            event_message(&ChangeEvent::new("/w/a/logo.png", ChangeKind::Added)),
            "New file detected: logo.png"
        );
        assert_eq!(
            event_message(&ChangeEvent::new("/w/app.js", ChangeKind::Modified)),
            "File changed: app.js"
        );
        assert_eq!(
            event_message(&ChangeEvent::new("/w/old.txt", ChangeKind::Deleted)),
            "File deleted: old.txt"
        );
    }

    #[tokio::test]
    async fn test_start_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let cycle = Arc::new(CommitCycle::new(
            MockVcsClient::new(),
            WorkingTree,
            SharedBatch::new(),
            Notifier::disabled(),
            &WatchConfig::new(&missing),
        ));

        let result = WatchSession::start(&missing, Duration::from_secs(1), cycle);
        assert!(matches!(result, Err(WatchError::NotADirectory(_))));
    }

    #[tokio::test]
    async fn test_start_rejects_zero_period() {
        let dir = tempfile::tempdir().unwrap();
        let result = WatchSession::start(dir.path(), Duration::ZERO, idle_cycle(dir.path()));
        assert!(matches!(result, Err(WatchError::ZeroInterval)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stopped_session_records_and_commits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let cycle = idle_cycle(&root);
        let batch = cycle.batch().clone();

        let session = WatchSession::start(&root, Duration::from_millis(100), cycle).unwrap();
        session.stop().await;

        std::fs::write(root.join("late.txt"), "after stop\n").unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(batch.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stop_lets_in_flight_cycle_finish() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();

        let started = Arc::new(Notify::new());
        let finished = Arc::new(AtomicBool::new(false));
        let vcs = SlowVcs {
            started: started.clone(),
            finished: finished.clone(),
        };
        let (notifier, mut rx) = Notifier::channel();
        let cycle = Arc::new(CommitCycle::new(
            vcs,
            WorkingTree,
            SharedBatch::new(),
            notifier,
            &WatchConfig::new(&root),
        ));
        cycle.batch().record(root.join("notes.log"), ChangeKind::Added).await;

        let session = WatchSession::start(&root, Duration::from_millis(50), cycle).unwrap();
        tokio::time::timeout(Duration::from_secs(5), started.notified())
            .await
            .expect("a cycle should start within 5s");

        session.stop().await;
        assert!(finished.load(Ordering::SeqCst));

        let success = std::iter::from_fn(|| rx.try_recv().ok())
            .find(|n| n.level == NotificationLevel::Success)
            .expect("the in-flight cycle should report success");
        assert!(success.message.ends_with("Update notes.log"), "{}", success.message);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_session_commits_detected_change() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();

        let mut vcs = MockVcsClient::new();
        vcs.expect_stage_and_commit().returning(|_| Ok(Oid::zero()));
        vcs.expect_has_remote().returning(|_| false);

        let (notifier, mut rx) = Notifier::channel();
        let cycle = Arc::new(CommitCycle::new(
            vcs,
            WorkingTree,
            SharedBatch::new(),
            notifier,
            &WatchConfig::new(&root),
        ));

        let session = WatchSession::start(&root, Duration::from_millis(200), cycle).unwrap();
        std::fs::write(root.join("notes.log"), "hello\n").unwrap();

        let committed = tokio::time::timeout(Duration::from_secs(10), async {
            while let Some(note) = rx.recv().await {
                if note.level == NotificationLevel::Success {
                    return note.message;
                }
            }
            String::new()
        })
        .await
        .expect("a commit should happen within 10s");

        session.stop().await;
        assert!(committed.ends_with("Update notes.log"), "{committed}");
    }
}
