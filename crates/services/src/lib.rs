#![forbid(unsafe_code)]

pub mod app_services;
pub mod assessment;
pub mod autosave;
pub mod config;
pub mod draft_sync;
pub mod drafts;
pub mod error;
pub mod results_service;

pub use sdg_core::Clock;

pub use app_services::AppServices;
pub use assessment::{AssessmentService, AssessmentSession, SubmissionOutcome};
pub use autosave::{Autosaver, DEFAULT_AUTOSAVE_DELAY};
pub use config::{AssessmentConfig, GoalRange};
pub use draft_sync::{
    DisabledDraftSync, DraftAck, DraftSync, DraftSyncConfig, FullSnapshot, HttpDraftSync,
    SectionData, SectionDraft, SubmitAck,
};
pub use drafts::{DraftService, SaveStatus};
pub use error::{AppServicesError, DraftSyncError, ResultsError, SessionError};
pub use results_service::{ResultsService, SubmissionListItem, SubmissionReport};
