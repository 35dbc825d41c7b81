use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::field::FieldValue;
use crate::model::ids::{AssessmentId, ProjectId};

/// Snapshots older than this are discarded instead of restored.
pub const SNAPSHOT_TTL_HOURS: i64 = 24;

/// Timestamped, flat copy of the form state: field name to value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub data: BTreeMap<String, FieldValue>,
}

impl Snapshot {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, data: BTreeMap<String, FieldValue>) -> Self {
        Self { timestamp, data }
    }

    #[must_use]
    pub fn ttl() -> Duration {
        Duration::hours(SNAPSHOT_TTL_HOURS)
    }

    /// A snapshot is stale once it is strictly older than the TTL.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.timestamp) > Self::ttl()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Where a snapshot lives in local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    /// Whole-assessment draft of the single-page flow.
    Assessment {
        project: ProjectId,
        assessment: Option<AssessmentId>,
    },
    /// One page of the paged flow.
    Step {
        project: Option<ProjectId>,
        step: u32,
    },
}

impl SnapshotKey {
    #[must_use]
    pub fn project(&self) -> Option<ProjectId> {
        match self {
            SnapshotKey::Assessment { project, .. } => Some(*project),
            SnapshotKey::Step { project, .. } => *project,
        }
    }

    /// Prefix shared by every key of a project, used to clear its drafts.
    #[must_use]
    pub fn project_prefix(project: ProjectId) -> String {
        format!("sdg_assessment_{project}_")
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotKey::Assessment {
                project,
                assessment: Some(id),
            } => write!(f, "sdg_assessment_{project}_{id}"),
            SnapshotKey::Assessment {
                project,
                assessment: None,
            } => write!(f, "sdg_assessment_{project}_new"),
            SnapshotKey::Step {
                project: Some(project),
                step,
            } => write!(f, "sdg_assessment_{project}_step{step}"),
            SnapshotKey::Step {
                project: None,
                step,
            } => write!(f, "sdg_assessment_new_step{step}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn staleness_boundary_is_exclusive() {
        let snapshot = Snapshot::new(fixed_now(), BTreeMap::new());
        assert!(!snapshot.is_stale(fixed_now() + Duration::hours(24)));
        assert!(snapshot.is_stale(fixed_now() + Duration::hours(24) + Duration::seconds(1)));
    }

    #[test]
    fn storage_keys() {
        let project = ProjectId::new(4);
        let draft = SnapshotKey::Assessment {
            project,
            assessment: None,
        };
        assert_eq!(draft.to_string(), "sdg_assessment_4_new");
        let saved = SnapshotKey::Assessment {
            project,
            assessment: Some(AssessmentId::new(12)),
        };
        assert_eq!(saved.to_string(), "sdg_assessment_4_12");
        let step = SnapshotKey::Step {
            project: Some(project),
            step: 3,
        };
        assert_eq!(step.to_string(), "sdg_assessment_4_step3");
        assert!(step.to_string().starts_with(&SnapshotKey::project_prefix(project)));
        let anonymous = SnapshotKey::Step {
            project: None,
            step: 1,
        };
        assert_eq!(anonymous.to_string(), "sdg_assessment_new_step1");
    }

    #[test]
    fn timestamp_serializes_as_iso8601() {
        let snapshot = Snapshot::new(fixed_now(), BTreeMap::new());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["timestamp"], "2023-11-14T22:13:20Z");
    }
}
