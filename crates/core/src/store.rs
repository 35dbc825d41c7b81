use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Assessment, AssessmentError, FieldValue, GoalId, Snapshot, is_notes_field};
use crate::questionnaire::{FieldDescriptor, FieldKind, Questionnaire};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    #[error("field {field} does not belong to {goal}")]
    UnknownField { goal: GoalId, field: String },

    #[error("field {field} expects a {expected:?} value")]
    KindMismatch { field: String, expected: FieldKind },

    #[error("{value:?} is not an option of {field}")]
    UnknownOption { field: String, value: String },
}

/// Result of applying a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Values were written back; `fields` lists what was applied.
    Applied { fields: Vec<String> },
    /// Older than the TTL; nothing was applied.
    Stale,
}

/// Single writer of the in-progress [`Assessment`].
///
/// Field writes go through [`FormStore::record_field`], which applies the
/// form serialization rules: text is trimmed, `*_notes` text lands in the
/// section notes, empty selections are dropped.
#[derive(Debug, Clone)]
pub struct FormStore {
    assessment: Assessment,
    questionnaire: Arc<Questionnaire>,
}

impl FormStore {
    #[must_use]
    pub fn new(assessment: Assessment, questionnaire: Arc<Questionnaire>) -> Self {
        Self {
            assessment,
            questionnaire,
        }
    }

    #[must_use]
    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    #[must_use]
    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    /// Consumes the store, handing the assessment to the submitter.
    #[must_use]
    pub fn into_assessment(self) -> Assessment {
        self.assessment
    }

    /// Records one field change.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownField` if the field is not part of the
    /// section, `StoreError::KindMismatch` if the value shape does not fit the
    /// control, `StoreError::UnknownOption` if a choice is not one of the
    /// field's options, or `StoreError::Assessment` if the assessment is read-only.
    pub fn record_field(
        &mut self,
        goal: GoalId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), StoreError> {
        let descriptor = self
            .questionnaire
            .section(goal)
            .and_then(|section| section.field(field))
            .ok_or_else(|| StoreError::UnknownField {
                goal,
                field: field.to_string(),
            })?;
        let value = normalize(descriptor, value)?;
        if is_notes_field(field) {
            let notes = value.as_text().unwrap_or_default().to_string();
            self.assessment.set_notes(goal, notes)?;
        } else {
            self.assessment.set_input(goal, field, value)?;
        }
        Ok(())
    }

    /// Makes the assessment read-only.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Assessment` if it was already finalized.
    pub fn finalize(&mut self, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.assessment.finalize(at)?;
        Ok(())
    }

    /// Clears a radio group or text field.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Assessment` if the assessment is read-only or the section is unknown.
    pub fn clear_field(&mut self, goal: GoalId, field: &str) -> Result<(), StoreError> {
        if is_notes_field(field) {
            self.assessment.set_notes(goal, "")?;
        } else {
            self.assessment.section_mut(goal)?.clear_input(field);
        }
        Ok(())
    }

    /// Flattens every section into a timestamped `field -> value` map.
    #[must_use]
    pub fn snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        self.snapshot_of(self.assessment.goal_ids(), now)
    }

    /// Like [`FormStore::snapshot`] but limited to the given sections.
    pub fn snapshot_of(
        &self,
        goals: impl IntoIterator<Item = GoalId>,
        now: DateTime<Utc>,
    ) -> Snapshot {
        let mut data = BTreeMap::new();
        for goal in goals {
            let Some(section) = self.assessment.section(goal) else {
                continue;
            };
            for (name, value) in section.inputs() {
                data.insert(name.clone(), value.clone());
            }
            if !section.notes().is_empty() {
                data.insert(
                    goal.notes_field(),
                    FieldValue::Text(section.notes().to_string()),
                );
            }
        }
        Snapshot::new(now, data)
    }

    /// Writes a snapshot back into the matching sections.
    ///
    /// Snapshots older than the TTL are refused. Keys that match no field,
    /// and choices that match none of the field's options, are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Assessment` if the assessment is read-only.
    pub fn restore(
        &mut self,
        snapshot: &Snapshot,
        now: DateTime<Utc>,
    ) -> Result<RestoreOutcome, StoreError> {
        if snapshot.is_stale(now) {
            debug!(saved_at = %snapshot.timestamp, "ignoring stale snapshot");
            return Ok(RestoreOutcome::Stale);
        }
        if self.assessment.is_finalized() {
            return Err(AssessmentError::Finalized.into());
        }
        let questionnaire = Arc::clone(&self.questionnaire);
        let mut applied = Vec::new();
        for (name, value) in &snapshot.data {
            let Some((goal, _)) = questionnaire.locate(name) else {
                warn!(field = %name, "snapshot field has no matching control");
                continue;
            };
            match self.record_field(goal, name, value.clone()) {
                Ok(()) => applied.push(name.clone()),
                Err(StoreError::KindMismatch { field, expected }) => {
                    warn!(%field, ?expected, "snapshot value does not fit its control");
                }
                Err(StoreError::UnknownOption { field, value }) => {
                    warn!(%field, %value, "snapshot choice matches no option");
                }
                Err(StoreError::Assessment(AssessmentError::UnknownSection(goal))) => {
                    debug!(%goal, "snapshot section not part of this assessment");
                }
                Err(other) => return Err(other),
            }
        }
        Ok(RestoreOutcome::Applied { fields: applied })
    }
}

fn normalize(descriptor: &FieldDescriptor, value: FieldValue) -> Result<FieldValue, StoreError> {
    let field = descriptor.name();
    let unknown = |value: &str| StoreError::UnknownOption {
        field: field.to_string(),
        value: value.to_string(),
    };
    match (descriptor.kind(), value) {
        (FieldKind::SingleChoice, FieldValue::Text(choice)) => {
            let choice = FieldValue::text(choice);
            match choice.as_text() {
                Some(text) if !text.is_empty() && !descriptor.offers(text) => Err(unknown(text)),
                _ => Ok(choice),
            }
        }
        (FieldKind::FreeText, FieldValue::Text(text)) => Ok(FieldValue::text(text)),
        (FieldKind::MultiChoice, FieldValue::Choices(values)) => {
            if let Some(stray) = values.iter().find(|value| !descriptor.offers(value)) {
                return Err(unknown(stray));
            }
            Ok(FieldValue::Choices(values))
        }
        // A lone checked box of a group serializes as its value.
        (FieldKind::MultiChoice, FieldValue::Text(single)) => {
            if !descriptor.offers(&single) {
                return Err(unknown(&single));
            }
            Ok(FieldValue::choices([single]))
        }
        (FieldKind::Toggle, FieldValue::Flag(checked)) => Ok(FieldValue::Flag(checked)),
        (kind, _) => Err(StoreError::KindMismatch {
            field: field.to_string(),
            expected: kind,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProjectId;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn store() -> FormStore {
        let questionnaire = Arc::new(Questionnaire::canonical());
        let assessment = Assessment::new(ProjectId::new(7), None, questionnaire.goals()).unwrap();
        FormStore::new(assessment, questionnaire)
    }

    fn filled() -> FormStore {
        let mut store = store();
        let g1 = GoalId::new(1);
        let g3 = GoalId::new(3);
        store
            .record_field(g1, "sdg1_cost_reduction", FieldValue::text("cost_reduc_3"))
            .unwrap();
        store
            .record_field(g1, "sdg1_baseline_cost", FieldValue::text(" 500/month "))
            .unwrap();
        store
            .record_field(g1, "sdg1_notes", FieldValue::text("Solar panels installed."))
            .unwrap();
        store
            .record_field(
                g3,
                "sdg3_actions",
                FieldValue::choices(["materials", "air_quality"]),
            )
            .unwrap();
        store
            .record_field(g3, "sdg3_health_summary", FieldValue::text("2"))
            .unwrap();
        store
    }

    #[test]
    fn notes_fields_route_to_section_notes() {
        let store = filled();
        let section = store.assessment().section(GoalId::new(1)).unwrap();
        assert_eq!(section.notes(), "Solar panels installed.");
        assert!(section.input("sdg1_notes").is_none());
        assert_eq!(section.text("sdg1_baseline_cost"), Some("500/month"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut store = store();
        let err = store
            .record_field(GoalId::new(2), "sdg1_cost_reduction", FieldValue::text("x"))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownField { .. }));
    }

    #[test]
    fn wrong_value_shape_is_rejected() {
        let mut store = store();
        let err = store
            .record_field(GoalId::new(2), "sdg2_food_integration", FieldValue::Flag(true))
            .unwrap_err();
        assert!(matches!(err, StoreError::KindMismatch { .. }));
    }

    #[test]
    fn clearing_a_radio_removes_it() {
        let mut store = filled();
        store.clear_field(GoalId::new(3), "sdg3_health_summary").unwrap();
        let section = store.assessment().section(GoalId::new(3)).unwrap();
        assert!(section.input("sdg3_health_summary").is_none());
    }

    #[test]
    fn snapshot_is_flat_and_timestamped() {
        let snapshot = filled().snapshot(fixed_now());
        assert_eq!(snapshot.timestamp, fixed_now());
        assert_eq!(
            snapshot.data.get("sdg1_cost_reduction"),
            Some(&FieldValue::text("cost_reduc_3"))
        );
        assert_eq!(
            snapshot.data.get("sdg1_notes"),
            Some(&FieldValue::text("Solar panels installed."))
        );
        assert_eq!(snapshot.data.len(), 5);
    }

    #[test]
    fn restore_of_snapshot_reproduces_assessment() {
        let original = filled();
        let snapshot = original.snapshot(fixed_now());

        let mut fresh = store();
        let outcome = fresh.restore(&snapshot, fixed_now() + Duration::hours(1)).unwrap();
        assert!(matches!(outcome, RestoreOutcome::Applied { ref fields } if fields.len() == 5));
        assert_eq!(fresh.assessment(), original.assessment());
    }

    #[test]
    fn stale_snapshot_is_never_applied() {
        let snapshot = filled().snapshot(fixed_now());
        let mut fresh = store();
        let outcome = fresh
            .restore(&snapshot, fixed_now() + Duration::hours(25))
            .unwrap();
        assert_eq!(outcome, RestoreOutcome::Stale);
        assert_eq!(fresh.assessment(), store().assessment());
    }

    #[test]
    fn restore_skips_unknown_fields() {
        let mut data = BTreeMap::new();
        data.insert("sdg42_mystery".to_string(), FieldValue::text("x"));
        data.insert("sdg2_food_integration".to_string(), FieldValue::text("study"));
        let snapshot = Snapshot::new(fixed_now(), data);
        let mut fresh = store();
        let outcome = fresh.restore(&snapshot, fixed_now()).unwrap();
        assert_eq!(
            outcome,
            RestoreOutcome::Applied {
                fields: vec!["sdg2_food_integration".to_string()]
            }
        );
    }

    #[test]
    fn choice_outside_the_radio_group_is_rejected() {
        let mut store = store();
        let g1 = GoalId::new(1);
        let err = store
            .record_field(g1, "sdg1_cost_reduction", FieldValue::text("not_an_option"))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownOption { ref value, .. } if value == "not_an_option"));
        let section = store.assessment().section(g1).unwrap();
        assert!(section.input("sdg1_cost_reduction").is_none());
        assert!(!crate::validation::is_section_complete(
            section,
            store.questionnaire().required_fields(g1)
        ));
    }

    #[test]
    fn unknown_checkbox_value_is_rejected() {
        let mut store = store();
        let err = store
            .record_field(
                GoalId::new(5),
                "sdg5_actions",
                FieldValue::choices(["childcare", "helipad"]),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownOption { ref value, .. } if value == "helipad"));
    }

    #[test]
    fn restore_leaves_unmatched_choices_unanswered() {
        let mut data = BTreeMap::new();
        data.insert("sdg1_cost_reduction".to_string(), FieldValue::text("bogus"));
        data.insert("sdg2_food_integration".to_string(), FieldValue::text("study"));
        let snapshot = Snapshot::new(fixed_now(), data);
        let mut fresh = store();
        let outcome = fresh.restore(&snapshot, fixed_now()).unwrap();
        assert_eq!(
            outcome,
            RestoreOutcome::Applied {
                fields: vec!["sdg2_food_integration".to_string()]
            }
        );
        let g1 = GoalId::new(1);
        let section = fresh.assessment().section(g1).unwrap();
        assert!(section.input("sdg1_cost_reduction").is_none());
        assert!(!crate::validation::is_section_complete(
            section,
            fresh.questionnaire().required_fields(g1)
        ));
    }

    #[test]
    fn single_string_for_checkbox_group_is_accepted() {
        let mut store = store();
        store
            .record_field(GoalId::new(5), "sdg5_actions", FieldValue::text("childcare"))
            .unwrap();
        let section = store.assessment().section(GoalId::new(5)).unwrap();
        assert_eq!(
            section.input("sdg5_actions"),
            Some(&FieldValue::choices(["childcare"]))
        );
    }

    #[test]
    fn finalized_store_rejects_writes() {
        let mut store = filled();
        store.finalize(fixed_now()).unwrap();
        let err = store
            .record_field(GoalId::new(2), "sdg2_food_integration", FieldValue::text("study"))
            .unwrap_err();
        assert_eq!(err, StoreError::Assessment(AssessmentError::Finalized));
    }
}
