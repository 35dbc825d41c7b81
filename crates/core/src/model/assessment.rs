use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::field::FieldValue;
use crate::model::ids::{AssessmentId, GoalId, ProjectId};
use crate::model::section::Section;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("assessment has no sections")]
    NoSections,

    #[error("assessment was already submitted and is read-only")]
    Finalized,

    #[error("unknown section {0}")]
    UnknownSection(GoalId),
}

//
// ─── ASSESSMENT ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Draft,
    Submitted { at: DateTime<Utc> },
}

/// Ordered collection of goal sections for one project.
///
/// Sections are keyed by [`GoalId`]; iteration follows goal order. Once
/// [`Assessment::finalize`] succeeds every mutator returns
/// [`AssessmentError::Finalized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    project_id: ProjectId,
    assessment_id: Option<AssessmentId>,
    sections: BTreeMap<GoalId, Section>,
    status: AssessmentStatus,
}

impl Assessment {
    /// Starts a draft with one empty section per goal.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NoSections` if `goals` is empty.
    pub fn new(
        project_id: ProjectId,
        assessment_id: Option<AssessmentId>,
        goals: impl IntoIterator<Item = GoalId>,
    ) -> Result<Self, AssessmentError> {
        let sections: BTreeMap<GoalId, Section> =
            goals.into_iter().map(|goal| (goal, Section::new())).collect();
        if sections.is_empty() {
            return Err(AssessmentError::NoSections);
        }
        Ok(Self {
            project_id,
            assessment_id,
            sections,
            status: AssessmentStatus::Draft,
        })
    }

    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    #[must_use]
    pub fn assessment_id(&self) -> Option<AssessmentId> {
        self.assessment_id
    }

    #[must_use]
    pub fn status(&self) -> AssessmentStatus {
        self.status
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        matches!(self.status, AssessmentStatus::Submitted { .. })
    }

    #[must_use]
    pub fn section(&self, goal: GoalId) -> Option<&Section> {
        self.sections.get(&goal)
    }

    /// Sections in goal order.
    pub fn sections(&self) -> impl Iterator<Item = (GoalId, &Section)> {
        self.sections.iter().map(|(goal, section)| (*goal, section))
    }

    pub fn goal_ids(&self) -> impl Iterator<Item = GoalId> + '_ {
        self.sections.keys().copied()
    }

    /// # Errors
    ///
    /// Returns `AssessmentError::Finalized` once submitted, or
    /// `AssessmentError::UnknownSection` if the goal is not part of this assessment.
    pub fn section_mut(&mut self, goal: GoalId) -> Result<&mut Section, AssessmentError> {
        if self.is_finalized() {
            return Err(AssessmentError::Finalized);
        }
        self.sections
            .get_mut(&goal)
            .ok_or(AssessmentError::UnknownSection(goal))
    }

    /// # Errors
    ///
    /// See [`Assessment::section_mut`].
    pub fn set_input(
        &mut self,
        goal: GoalId,
        field: impl Into<String>,
        value: FieldValue,
    ) -> Result<(), AssessmentError> {
        self.section_mut(goal)?.set_input(field, value);
        Ok(())
    }

    /// # Errors
    ///
    /// See [`Assessment::section_mut`].
    pub fn set_notes(&mut self, goal: GoalId, notes: impl AsRef<str>) -> Result<(), AssessmentError> {
        self.section_mut(goal)?.set_notes(notes);
        Ok(())
    }

    /// Attaches the server id once the backend has created the assessment.
    pub fn assign_id(&mut self, id: AssessmentId) {
        self.assessment_id = Some(id);
    }

    /// Marks the assessment read-only.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Finalized` if it was already submitted.
    pub fn finalize(&mut self, at: DateTime<Utc>) -> Result<(), AssessmentError> {
        if self.is_finalized() {
            return Err(AssessmentError::Finalized);
        }
        self.status = AssessmentStatus::Submitted { at };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn draft() -> Assessment {
        Assessment::new(ProjectId::new(1), None, (1..=3).map(GoalId::new)).unwrap()
    }

    #[test]
    fn new_rejects_empty_goal_list() {
        let err = Assessment::new(ProjectId::new(1), None, std::iter::empty()).unwrap_err();
        assert_eq!(err, AssessmentError::NoSections);
    }

    #[test]
    fn sections_iterate_in_goal_order() {
        let assessment =
            Assessment::new(ProjectId::new(1), None, [3, 1, 2].map(GoalId::new)).unwrap();
        let ids: Vec<u32> = assessment.goal_ids().map(|g| g.number()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn unknown_section_is_rejected() {
        let mut assessment = draft();
        let err = assessment
            .set_input(GoalId::new(9), "sdg9_innovation_summary", FieldValue::text("3"))
            .unwrap_err();
        assert_eq!(err, AssessmentError::UnknownSection(GoalId::new(9)));
    }

    #[test]
    fn finalized_assessment_is_read_only() {
        let mut assessment = draft();
        assessment.finalize(fixed_now()).unwrap();
        assert!(assessment.is_finalized());
        let err = assessment.set_notes(GoalId::new(1), "late edit").unwrap_err();
        assert_eq!(err, AssessmentError::Finalized);
        assert_eq!(assessment.finalize(fixed_now()), Err(AssessmentError::Finalized));
    }

    #[test]
    fn json_shape_keys_sections_by_goal() {
        let mut assessment = draft();
        assessment
            .set_input(GoalId::new(1), "sdg1_cost_reduction", FieldValue::text("cost_reduc_3"))
            .unwrap();
        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(
            json["sections"]["sdg-1"]["inputs"]["sdg1_cost_reduction"],
            "cost_reduc_3"
        );
        let back: Assessment = serde_json::from_value(json).unwrap();
        assert_eq!(back, assessment);
    }
}
