#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    DraftRepository, InMemoryRepository, NewSubmission, Storage, StorageError, SubmissionRecord,
    SubmissionRepository,
};
