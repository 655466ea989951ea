//! Change batches accumulated between commit cycles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::analysis::ChangeKind;

/// Paths touched since the last commit cycle, each with its latest kind.
///
/// Iteration follows the order in which paths were first touched. Touching a
/// path again replaces its kind but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    order: Vec<PathBuf>,
    kinds: HashMap<PathBuf, ChangeKind>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change; the most recent kind for a path wins.
    pub fn record(&mut self, path: impl Into<PathBuf>, kind: ChangeKind) {
        let path = path.into();
        if self.kinds.insert(path.clone(), kind).is_none() {
            self.order.push(path);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Paths with their latest kind, in first-touch order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, ChangeKind)> {
        self.order
            .iter()
            .map(|path| (path.as_path(), self.kinds[path]))
    }

    /// Fold an older batch back in underneath this one.
    ///
    /// Paths from `older` come first; kinds recorded in `self` win.
    pub fn absorb_older(&mut self, older: ChangeBatch) {
        let newer = std::mem::replace(self, older);
        for (path, kind) in newer.iter() {
            self.record(path, kind);
        }
    }
}

impl<P: Into<PathBuf>> FromIterator<(P, ChangeKind)> for ChangeBatch {
    fn from_iter<I: IntoIterator<Item = (P, ChangeKind)>>(iter: I) -> Self {
        let mut batch = ChangeBatch::new();
        for (path, kind) in iter {
            batch.record(path, kind);
        }
        batch
    }
}

/// A [`ChangeBatch`] shared between the change feed and the commit cycle.
#[derive(Debug, Clone, Default)]
pub struct SharedBatch {
    inner: Arc<Mutex<ChangeBatch>>,
}

impl SharedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, path: impl Into<PathBuf>, kind: ChangeKind) {
        self.inner.lock().await.record(path, kind);
    }

    /// Swap in an empty batch and hand back everything accumulated so far.
    pub async fn take(&self) -> ChangeBatch {
        std::mem::take(&mut *self.inner.lock().await)
    }

    /// Put a batch that failed to commit back, under any newer changes.
    pub async fn restore(&self, failed: ChangeBatch) {
        self.inner.lock().await.absorb_older(failed);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
