//! Shared error types for the services crate.

use thiserror::Error;

use sdg_core::model::{AssessmentError, SubmissionId};
use sdg_core::{NavigationError, StoreError, SubmitError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by a `DraftSync` implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DraftSyncError {
    #[error("server sync is not configured")]
    Disabled,
    #[error("server rejected the draft: {0}")]
    Rejected(String),
    #[error("save request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by an `AssessmentSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("assessment already submitted")]
    Submitted,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ResultsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultsError {
    #[error("submission {0} not found")]
    NotFound(SubmissionId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
