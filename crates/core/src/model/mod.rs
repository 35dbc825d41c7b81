mod assessment;
mod field;
mod goal;
mod ids;
mod section;
mod snapshot;

pub use assessment::{Assessment, AssessmentError, AssessmentStatus};
pub use field::{FieldValue, is_notes_field};
pub use goal::{
    CANONICAL_GOAL_COUNT, Category, EXTENDED_GOAL_COUNT, GoalInfo, canonical_goals,
    extended_goals,
};
pub use ids::{AssessmentId, GoalId, ParseIdError, ProjectId, SubmissionId};
pub use section::Section;
pub use snapshot::{SNAPSHOT_TTL_HOURS, Snapshot, SnapshotKey};
