use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier of the project being assessed
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(u64);

impl ProjectId {
    /// Creates a new `ProjectId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Server-side identifier of an assessment that has already been created
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(u64);

impl AssessmentId {
    /// Creates a new `AssessmentId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Identifier of a stored, finalized submission
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(u64);

impl SubmissionId {
    /// Creates a new `SubmissionId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Stable identifier of a goal section, rendered as `sdg-N`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GoalId(u32);

impl GoalId {
    /// Creates a new `GoalId` from the goal number
    #[must_use]
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Returns the goal number
    #[must_use]
    pub fn number(&self) -> u32 {
        self.0
    }

    /// Prefix shared by every field name of this goal, e.g. `sdg7`.
    #[must_use]
    pub fn field_prefix(&self) -> String {
        format!("sdg{}", self.0)
    }

    /// Name of the free-text evidence field of this goal.
    #[must_use]
    pub fn notes_field(&self) -> String {
        format!("sdg{}_notes", self.0)
    }
}

impl fmt::Debug for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectId({})", self.0)
    }
}

impl fmt::Debug for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssessmentId({})", self.0)
    }
}

impl fmt::Debug for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubmissionId({})", self.0)
    }
}

impl fmt::Debug for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GoalId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sdg-{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for ProjectId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(ProjectId::new)
            .map_err(|_| ParseIdError {
                kind: "ProjectId".to_string(),
            })
    }
}

impl FromStr for AssessmentId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(AssessmentId::new)
            .map_err(|_| ParseIdError {
                kind: "AssessmentId".to_string(),
            })
    }
}

impl FromStr for SubmissionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(SubmissionId::new)
            .map_err(|_| ParseIdError {
                kind: "SubmissionId".to_string(),
            })
    }
}

/// Accepts both `sdg-7` and a bare `7`.
impl FromStr for GoalId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix("sdg-").unwrap_or(s.trim());
        match digits.parse::<u32>() {
            Ok(n) if n > 0 => Ok(GoalId::new(n)),
            _ => Err(ParseIdError {
                kind: "GoalId".to_string(),
            }),
        }
    }
}

// ─── Serde ─────────────────────────────────────────────────────────────────────

impl Serialize for GoalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GoalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_id_display() {
        assert_eq!(GoalId::new(7).to_string(), "sdg-7");
    }

    #[test]
    fn test_goal_id_from_str_accepts_prefixed_and_bare() {
        assert_eq!("sdg-12".parse::<GoalId>().unwrap(), GoalId::new(12));
        assert_eq!("3".parse::<GoalId>().unwrap(), GoalId::new(3));
    }

    #[test]
    fn test_goal_id_from_str_rejects_zero_and_garbage() {
        assert!("sdg-0".parse::<GoalId>().is_err());
        assert!("sdg-x".parse::<GoalId>().is_err());
        assert!("goal-4".parse::<GoalId>().is_err());
    }

    #[test]
    fn test_goal_id_field_names() {
        let id = GoalId::new(3);
        assert_eq!(id.field_prefix(), "sdg3");
        assert_eq!(id.notes_field(), "sdg3_notes");
    }

    #[test]
    fn test_goal_id_serializes_as_string_key() {
        let json = serde_json::to_string(&GoalId::new(5)).unwrap();
        assert_eq!(json, "\"sdg-5\"");
        let back: GoalId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GoalId::new(5));
    }

    #[test]
    fn test_project_id_from_str() {
        let id: ProjectId = "123".parse().unwrap();
        assert_eq!(id, ProjectId::new(123));
        assert!("not-a-number".parse::<ProjectId>().is_err());
    }

    #[test]
    fn test_submission_id_display() {
        assert_eq!(SubmissionId::new(9).to_string(), "9");
    }
}
