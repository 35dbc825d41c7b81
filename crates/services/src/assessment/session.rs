use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sdg_core::model::{Assessment, GoalId, Snapshot, SnapshotKey, SubmissionId};
use sdg_core::{
    CompletionState, FormLayout, FormStore, Questionnaire, SectionFailure, SectionNavigator,
    Step, ValidationReport, validate_section,
};
use tokio::task::JoinHandle;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one open assessment form.
///
/// Holds the form store, the navigator and what the view needs to show
/// (inline errors, the banner message). Persistence is driven by
/// `AssessmentService`.
pub struct AssessmentSession {
    store: FormStore,
    navigator: SectionNavigator,
    layout: FormLayout,
    errors: BTreeMap<GoalId, ValidationReport>,
    notice: Option<&'static str>,
    restored_fields: usize,
    submission: Option<SubmissionId>,
    pub(super) in_flight: Vec<JoinHandle<()>>,
}

impl AssessmentSession {
    pub(super) fn new(store: FormStore, navigator: SectionNavigator, layout: FormLayout) -> Self {
        Self {
            store,
            navigator,
            layout,
            errors: BTreeMap::new(),
            notice: None,
            restored_fields: 0,
            submission: None,
            in_flight: Vec::new(),
        }
    }

    #[must_use]
    pub fn assessment(&self) -> &Assessment {
        self.store.assessment()
    }

    #[must_use]
    pub fn questionnaire(&self) -> &Questionnaire {
        self.store.questionnaire()
    }

    #[must_use]
    pub fn layout(&self) -> FormLayout {
        self.layout
    }

    #[must_use]
    pub fn navigator(&self) -> &SectionNavigator {
        &self.navigator
    }

    #[must_use]
    pub fn current_step(&self) -> &Step {
        self.navigator.current_step()
    }

    #[must_use]
    pub fn current_sections(&self) -> &[GoalId] {
        self.navigator.current_sections()
    }

    #[must_use]
    pub fn step_index(&self) -> usize {
        self.navigator.current_index()
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.navigator.step_count()
    }

    #[must_use]
    pub fn completion(&self) -> CompletionState {
        self.navigator
            .completion(self.store.assessment(), self.store.questionnaire())
    }

    /// Missing required fields of `goal` from the last blocked move.
    #[must_use]
    pub fn errors_for(&self, goal: GoalId) -> Option<&ValidationReport> {
        self.errors.get(&goal)
    }

    #[must_use]
    pub fn has_field_error(&self, goal: GoalId, field: &str) -> bool {
        self.errors
            .get(&goal)
            .is_some_and(|report| report.is_missing(field))
    }

    /// Banner text from the last blocked move, if still relevant.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// How many fields were filled from a saved draft on open.
    #[must_use]
    pub fn restored_fields(&self) -> usize {
        self.restored_fields
    }

    #[must_use]
    pub fn submission(&self) -> Option<SubmissionId> {
        self.submission
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.store.assessment().is_finalized()
    }

    /// Storage key for the draft holding step `index`.
    #[must_use]
    pub fn draft_key(&self, index: usize) -> SnapshotKey {
        let assessment = self.store.assessment();
        match self.layout {
            FormLayout::SinglePage => SnapshotKey::Assessment {
                project: assessment.project_id(),
                assessment: assessment.assessment_id(),
            },
            FormLayout::Paged => SnapshotKey::Step {
                project: Some(assessment.project_id()),
                step: self
                    .navigator
                    .steps()
                    .get(index)
                    .map_or(0, |step| step.number),
            },
        }
    }

    /// Every key this session may have written.
    #[must_use]
    pub fn draft_keys(&self) -> Vec<SnapshotKey> {
        match self.layout {
            FormLayout::SinglePage => vec![self.draft_key(0)],
            FormLayout::Paged => (0..self.step_count()).map(|i| self.draft_key(i)).collect(),
        }
    }

    /// Snapshot stored under [`AssessmentSession::draft_key`] for step `index`.
    ///
    /// The single-page flow keeps the whole assessment in one draft; the
    /// paged flow stores each page on its own.
    #[must_use]
    pub fn draft_snapshot(&self, index: usize, now: DateTime<Utc>) -> Snapshot {
        match self.layout {
            FormLayout::SinglePage => self.store.snapshot(now),
            FormLayout::Paged => {
                let goals = self
                    .navigator
                    .steps()
                    .get(index)
                    .map(|step| step.goals.clone())
                    .unwrap_or_default();
                self.store.snapshot_of(goals, now)
            }
        }
    }

    pub(super) fn store_mut(&mut self) -> &mut FormStore {
        &mut self.store
    }

    pub(super) fn navigator_mut(&mut self) -> &mut SectionNavigator {
        &mut self.navigator
    }

    pub(super) fn parts_mut(&mut self) -> (&FormStore, &mut SectionNavigator) {
        (&self.store, &mut self.navigator)
    }

    pub(super) fn set_restored(&mut self, fields: usize) {
        self.restored_fields = fields;
    }

    pub(super) fn set_submission(&mut self, id: SubmissionId) {
        self.submission = Some(id);
    }

    pub(super) fn show_failures(&mut self, failures: Vec<SectionFailure>, notice: &'static str) {
        self.errors = failures
            .into_iter()
            .map(|failure| (failure.goal, failure.report))
            .collect();
        self.notice = Some(notice);
    }

    pub(super) fn clear_failures(&mut self) {
        self.errors.clear();
        self.notice = None;
    }

    /// Re-validates a section that is showing errors after an edit.
    pub(super) fn revalidate(&mut self, goal: GoalId) {
        if !self.errors.contains_key(&goal) {
            return;
        }
        let section = self
            .store
            .assessment()
            .section(goal)
            .cloned()
            .unwrap_or_default();
        let report = validate_section(
            &section,
            self.store.questionnaire().required_fields(goal),
        );
        if report.is_complete() {
            self.errors.remove(&goal);
        } else {
            self.errors.insert(goal, report);
        }
        if self.errors.is_empty() {
            self.notice = None;
        }
    }
}

impl std::fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("project", &self.store.assessment().project_id())
            .field("layout", &self.layout)
            .field("step", &self.navigator.current_index())
            .field("errors", &self.errors.len())
            .field("submission", &self.submission)
            .finish_non_exhaustive()
    }
}
