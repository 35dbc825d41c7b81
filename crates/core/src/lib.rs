#![forbid(unsafe_code)]

pub mod demo;
pub mod evidence;
pub mod model;
pub mod navigator;
pub mod questionnaire;
pub mod results;
pub mod scoring;
pub mod store;
pub mod time;
pub mod validation;

pub use evidence::{EVIDENCE_MAX_LEN, EvidenceMeter, EvidenceQuality};
pub use navigator::{
    CompletionState, NavigationError, ProgressTone, SectionFailure, SectionNavigator,
    SubmitError, Transition,
};
pub use questionnaire::{FieldDescriptor, FieldKind, FormLayout, Questionnaire, Step};
pub use results::{PerformanceLevel, ResultsReport};
pub use scoring::{ScoreEntry, ScoringTable};
pub use store::{FormStore, RestoreOutcome, StoreError};
pub use time::{Clock, fixed_clock, fixed_now};
pub use validation::{ValidationReport, is_section_complete, validate_section};
