mod service;
mod session;

pub use crate::error::SessionError;
pub use service::{AssessmentService, SubmissionOutcome};
pub use session::AssessmentSession;
