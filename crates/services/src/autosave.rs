use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use sdg_core::model::{Snapshot, SnapshotKey};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::drafts::{DraftService, SaveStatus};

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);

/// Debounced writer for local drafts.
///
/// Each key keeps at most one pending write. Scheduling again before the
/// delay elapses supersedes the earlier value, so only the latest snapshot
/// reaches storage.
pub struct Autosaver {
    drafts: Arc<DraftService>,
    delay: Duration,
    generation: AtomicU64,
    pending: Mutex<HashMap<SnapshotKey, u64>>,
    status: watch::Sender<SaveStatus>,
}

impl Autosaver {
    #[must_use]
    pub fn new(drafts: Arc<DraftService>, delay: Duration) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            drafts,
            delay,
            generation: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
            status,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub fn status(&self) -> SaveStatus {
        *self.status.borrow()
    }

    /// Queues `snapshot` for `key`, replacing any write still waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(self: &Arc<Self>, key: SnapshotKey, snapshot: Snapshot) -> JoinHandle<()> {
        let ticket = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.pending_map().insert(key, ticket);
        self.publish(SaveStatus::Pending);

        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(this.delay).await;
            if !this.take_if_current(&key, ticket) {
                trace!(%key, ticket, "autosave superseded");
                return;
            }
            let status = this.drafts.save(&key, &snapshot).await;
            this.publish(status);
        })
    }

    /// Writes immediately and drops any pending write for the same key.
    pub async fn flush(&self, key: SnapshotKey, snapshot: &Snapshot) -> SaveStatus {
        self.cancel(&key);
        let status = self.drafts.save(&key, snapshot).await;
        self.publish(status);
        status
    }

    /// Drops the pending write of `key`, if any.
    pub fn cancel(&self, key: &SnapshotKey) {
        self.pending_map().remove(key);
    }

    pub fn cancel_all(&self) {
        self.pending_map().clear();
    }

    /// Replaces the published status.
    pub fn publish(&self, status: SaveStatus) {
        self.status.send_replace(status);
    }

    fn take_if_current(&self, key: &SnapshotKey, ticket: u64) -> bool {
        let mut pending = self.pending_map();
        if pending.get(key) == Some(&ticket) {
            pending.remove(key);
            true
        } else {
            false
        }
    }

    fn pending_map(&self) -> std::sync::MutexGuard<'_, HashMap<SnapshotKey, u64>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
