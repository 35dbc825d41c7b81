use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sdg_core::model::{Assessment, ProjectId, Snapshot, SnapshotKey, SubmissionId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Local snapshot store, keyed by the composite storage key.
#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Insert or replace the snapshot stored under `key`.
    async fn save_draft(&self, key: &SnapshotKey, snapshot: &Snapshot) -> Result<(), StorageError>;

    async fn load_draft(&self, key: &SnapshotKey) -> Result<Option<Snapshot>, StorageError>;

    /// Remove one snapshot; removing a missing key is not an error.
    async fn delete_draft(&self, key: &SnapshotKey) -> Result<(), StorageError>;

    /// Remove every snapshot of a project. Returns how many were removed.
    async fn delete_project_drafts(&self, project: ProjectId) -> Result<u64, StorageError>;
}

//
// ─── SUBMISSIONS ───────────────────────────────────────────────────────────────
//

/// A finalized assessment ready to be stored.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assessment: Assessment,
    pub submitted_at: DateTime<Utc>,
}

impl NewSubmission {
    #[must_use]
    pub fn new(assessment: Assessment, submitted_at: DateTime<Utc>) -> Self {
        Self {
            assessment,
            submitted_at,
        }
    }
}

/// Stored submission. Scores are recomputed from `assessment` when read.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub project_id: ProjectId,
    pub assessment: Assessment,
    pub submitted_at: DateTime<Utc>,
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn append_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<SubmissionId, StorageError>;

    async fn get_submission(
        &self,
        id: SubmissionId,
    ) -> Result<Option<SubmissionRecord>, StorageError>;

    /// Most recent first.
    async fn list_submissions(
        &self,
        project: ProjectId,
        limit: u32,
    ) -> Result<Vec<SubmissionRecord>, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository for prototyping and tests.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    drafts: Arc<Mutex<HashMap<String, (Option<ProjectId>, Snapshot)>>>,
    submissions: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftRepository for InMemoryRepository {
    async fn save_draft(&self, key: &SnapshotKey, snapshot: &Snapshot) -> Result<(), StorageError> {
        let mut guard = self
            .drafts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), (key.project(), snapshot.clone()));
        Ok(())
    }

    async fn load_draft(&self, key: &SnapshotKey) -> Result<Option<Snapshot>, StorageError> {
        let guard = self
            .drafts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get(&key.to_string())
            .map(|(_, snapshot)| snapshot.clone()))
    }

    async fn delete_draft(&self, key: &SnapshotKey) -> Result<(), StorageError> {
        let mut guard = self
            .drafts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&key.to_string());
        Ok(())
    }

    async fn delete_project_drafts(&self, project: ProjectId) -> Result<u64, StorageError> {
        let mut guard = self
            .drafts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.len();
        guard.retain(|_, (owner, _)| *owner != Some(project));
        Ok((before - guard.len()) as u64)
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryRepository {
    async fn append_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<SubmissionId, StorageError> {
        let mut guard = self
            .submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = SubmissionId::new(guard.len() as u64 + 1);
        guard.push(SubmissionRecord {
            id,
            project_id: submission.assessment.project_id(),
            assessment: submission.assessment.clone(),
            submitted_at: submission.submitted_at,
        });
        Ok(id)
    }

    async fn get_submission(
        &self,
        id: SubmissionId,
    ) -> Result<Option<SubmissionRecord>, StorageError> {
        let guard = self
            .submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().find(|record| record.id == id).cloned())
    }

    async fn list_submissions(
        &self,
        project: ProjectId,
        limit: u32,
    ) -> Result<Vec<SubmissionRecord>, StorageError> {
        let guard = self
            .submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut records: Vec<SubmissionRecord> = guard
            .iter()
            .filter(|record| record.project_id == project)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        records.truncate(limit as usize);
        Ok(records)
    }
}

/// Aggregate storage facade that can be backed by different implementations.
#[derive(Clone)]
pub struct Storage {
    pub drafts: Arc<dyn DraftRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let drafts: Arc<dyn DraftRepository> = Arc::new(repo.clone());
        let submissions: Arc<dyn SubmissionRepository> = Arc::new(repo);
        Self {
            drafts,
            submissions,
        }
    }
}
