//! One commit cycle: drain the batch, describe it, commit, push.

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::analysis::ContentSource;
use crate::error::GitError;
use crate::git::VcsClient;
use crate::summary::{CommitMessage, SharedBatch, summarize};

use super::WatchConfig;
use super::notification::Notifier;

/// Advisory emitted after a commit when there is nowhere to push it.
pub const REMOTE_NOT_CONFIGURED: &str = "Remote repository not configured. \
     Please configure it with `autocommit remote <URL>` or `--remote <URL>`.";

/// What a single [`CommitCycle::run`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The batch was empty.
    Idle,
    /// Another cycle was still running.
    Skipped,
    /// A commit was created, and pushed if a remote exists.
    Committed { message: CommitMessage, pushed: bool },
    /// Git found nothing to commit; the batch was discarded.
    NothingToCommit,
    /// Staging or committing failed; the batch was restored for the next cycle.
    CommitFailed { error: String },
    /// The commit exists but could not be pushed.
    PushFailed { message: CommitMessage, error: String },
}

/// Drives the periodic commit.
///
/// `V` performs git operations and `S` supplies file content for analysis.
pub struct CommitCycle<V, S> {
    vcs: V,
    source: S,
    batch: SharedBatch,
    notifier: Notifier,
    remote: String,
    branch: String,
    in_flight: Mutex<()>,
}

impl<V, S> CommitCycle<V, S>
where
    V: VcsClient,
    S: ContentSource + Send + Sync,
{
    pub fn new(
        vcs: V,
        source: S,
        batch: SharedBatch,
        notifier: Notifier,
        config: &WatchConfig,
    ) -> Self {
        Self {
            vcs,
            source,
            batch,
            notifier,
            remote: config.remote.clone(),
            branch: config.branch.clone(),
            in_flight: Mutex::new(()),
        }
    }

    pub fn batch(&self) -> &SharedBatch {
        &self.batch
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Run one cycle. Returns immediately with `Skipped` if one is in flight.
    pub async fn run(&self) -> CycleOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Previous commit cycle still running, skipping tick");
            return CycleOutcome::Skipped;
        };

        let pending = self.batch.take().await;
        let Some(message) = summarize(&pending, &self.source) else {
            return CycleOutcome::Idle;
        };

        info!("Committing {} changed file(s)", pending.len());

        match self.vcs.stage_and_commit(message.as_str()).await {
            Ok(oid) => debug!("Created commit {}", oid),
            Err(GitError::NoChanges) => {
                self.notifier
                    .warning(format!("Nothing to commit for {} changed file(s)", pending.len()));
                return CycleOutcome::NothingToCommit;
            }
            Err(e) => {
                self.notifier.error(format!("Git operation failed: {e}"));
                self.batch.restore(pending).await;
                return CycleOutcome::CommitFailed { error: e.to_string() };
            }
        }

        let pushed = if self.vcs.has_remote(&self.remote).await {
            if let Err(e) = self.vcs.push(&self.remote, &self.branch).await {
                self.notifier.error(format!("Git operation failed: {e}"));
                return CycleOutcome::PushFailed {
                    message,
                    error: e.to_string(),
                };
            }
            true
        } else {
            self.notifier.warning(REMOTE_NOT_CONFIGURED);
            false
        };

        if pushed {
            self.notifier
                .success(format!("Successfully committed and pushed changes:\n{message}"));
        } else {
            self.notifier
                .success(format!("Successfully committed changes:\n{message}"));
        }

        CycleOutcome::Committed { message, pushed }
    }
}
