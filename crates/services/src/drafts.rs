use std::sync::Arc;

use chrono::{DateTime, Utc};
use sdg_core::model::{ProjectId, Snapshot, SnapshotKey};
use storage::repository::DraftRepository;
use tracing::{debug, warn};

use crate::Clock;

pub const LOCAL_UNAVAILABLE_MESSAGE: &str = "Changes may be lost if you leave this page.";
pub const REMOTE_FAILED_MESSAGE: &str =
    "Error saving progress. Changes will be saved when you submit.";

/// What the form shows next to the save indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    /// A debounced write is waiting for its timer.
    Pending,
    Saved { at: DateTime<Utc> },
    /// The local draft store failed; editing continues in memory.
    LocalUnavailable,
    /// The server rejected or never answered an auto-save.
    RemoteFailed,
}

impl SaveStatus {
    /// User-facing warning, if any.
    #[must_use]
    pub fn message(self) -> Option<&'static str> {
        match self {
            SaveStatus::LocalUnavailable => Some(LOCAL_UNAVAILABLE_MESSAGE),
            SaveStatus::RemoteFailed => Some(REMOTE_FAILED_MESSAGE),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_warning(self) -> bool {
        self.message().is_some()
    }
}

/// Local draft persistence with the 24h freshness rule applied.
///
/// Storage failures never reach the caller as errors: saves report
/// [`SaveStatus::LocalUnavailable`] and loads behave as "no draft".
#[derive(Clone)]
pub struct DraftService {
    clock: Clock,
    drafts: Arc<dyn DraftRepository>,
}

impl DraftService {
    #[must_use]
    pub fn new(clock: Clock, drafts: Arc<dyn DraftRepository>) -> Self {
        Self { clock, drafts }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub async fn save(&self, key: &SnapshotKey, snapshot: &Snapshot) -> SaveStatus {
        match self.drafts.save_draft(key, snapshot).await {
            Ok(()) => {
                debug!(%key, fields = snapshot.data.len(), "draft saved");
                SaveStatus::Saved {
                    at: snapshot.timestamp,
                }
            }
            Err(err) => {
                warn!(%key, error = %err, "local draft store unavailable");
                SaveStatus::LocalUnavailable
            }
        }
    }

    /// Returns the draft under `key` if it is fresh. Stale drafts are removed.
    pub async fn load(&self, key: &SnapshotKey) -> Option<Snapshot> {
        let snapshot = match self.drafts.load_draft(key).await {
            Ok(found) => found?,
            Err(err) => {
                warn!(%key, error = %err, "could not read local draft");
                return None;
            }
        };
        if snapshot.is_stale(self.clock.now()) {
            debug!(%key, saved_at = %snapshot.timestamp, "discarding stale draft");
            if let Err(err) = self.drafts.delete_draft(key).await {
                warn!(%key, error = %err, "could not remove stale draft");
            }
            return None;
        }
        Some(snapshot)
    }

    pub async fn discard(&self, key: &SnapshotKey) {
        if let Err(err) = self.drafts.delete_draft(key).await {
            warn!(%key, error = %err, "could not remove draft");
        }
    }

    /// Removes every draft of a project. Returns how many were removed.
    pub async fn clear_project(&self, project: ProjectId) -> u64 {
        match self.drafts.delete_project_drafts(project).await {
            Ok(removed) => {
                debug!(%project, removed, "cleared project drafts");
                removed
            }
            Err(err) => {
                warn!(%project, error = %err, "could not clear project drafts");
                0
            }
        }
    }
}
