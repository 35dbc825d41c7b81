use std::sync::Arc;

use sdg_core::model::{Assessment, AssessmentId, FieldValue, GoalId, ProjectId, SubmissionId};
use sdg_core::navigator::{INCOMPLETE_STEP_MESSAGE, INCOMPLETE_SUBMIT_MESSAGE};
use sdg_core::{
    FormLayout, FormStore, NavigationError, Questionnaire, RestoreOutcome, ScoreEntry,
    ScoringTable, SectionNavigator, Transition,
};
use storage::repository::{NewSubmission, SubmissionRepository};
use tracing::{debug, info, warn};

use super::session::AssessmentSession;
use crate::Clock;
use crate::autosave::Autosaver;
use crate::draft_sync::{DraftSync, FullSnapshot, SectionDraft};
use crate::drafts::{DraftService, SaveStatus};
use crate::error::SessionError;

/// Outcome of a successful submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub id: SubmissionId,
    pub scores: Vec<ScoreEntry>,
}

/// Opens assessments and drives their persistence.
#[derive(Clone)]
pub struct AssessmentService {
    clock: Clock,
    layout: FormLayout,
    questionnaire: Arc<Questionnaire>,
    scoring: Arc<ScoringTable>,
    drafts: Arc<DraftService>,
    autosaver: Arc<Autosaver>,
    sync: Arc<dyn DraftSync>,
    submissions: Arc<dyn SubmissionRepository>,
}

impl AssessmentService {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: Clock,
        layout: FormLayout,
        questionnaire: Arc<Questionnaire>,
        scoring: Arc<ScoringTable>,
        drafts: Arc<DraftService>,
        autosaver: Arc<Autosaver>,
        sync: Arc<dyn DraftSync>,
        submissions: Arc<dyn SubmissionRepository>,
    ) -> Self {
        Self {
            clock,
            layout,
            questionnaire,
            scoring,
            drafts,
            autosaver,
            sync,
            submissions,
        }
    }

    #[must_use]
    pub fn layout(&self) -> FormLayout {
        self.layout
    }

    #[must_use]
    pub fn questionnaire(&self) -> Arc<Questionnaire> {
        Arc::clone(&self.questionnaire)
    }

    #[must_use]
    pub fn scoring(&self) -> Arc<ScoringTable> {
        Arc::clone(&self.scoring)
    }

    #[must_use]
    pub fn autosaver(&self) -> Arc<Autosaver> {
        Arc::clone(&self.autosaver)
    }

    /// Opens a form for `project`, filling it from fresh local drafts.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the questionnaire is empty.
    pub async fn start(
        &self,
        project: ProjectId,
        assessment_id: Option<AssessmentId>,
    ) -> Result<AssessmentSession, SessionError> {
        let assessment = Assessment::new(project, assessment_id, self.questionnaire.goals())?;
        let store = FormStore::new(assessment, Arc::clone(&self.questionnaire));
        let navigator = SectionNavigator::new(self.questionnaire.steps(self.layout))?;
        let mut session = AssessmentSession::new(store, navigator, self.layout);

        let now = self.clock.now();
        let mut restored = 0;
        for key in session.draft_keys() {
            let Some(snapshot) = self.drafts.load(&key).await else {
                continue;
            };
            match session.store_mut().restore(&snapshot, now)? {
                RestoreOutcome::Applied { fields } => restored += fields.len(),
                RestoreOutcome::Stale => {}
            }
        }
        if restored > 0 {
            info!(%project, restored, "restored saved draft");
        }
        session.set_restored(restored);
        Ok(session)
    }

    /// Records one answer and schedules a debounced local save.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` for unknown fields, mismatched values or
    /// a submitted assessment.
    pub fn record(
        &self,
        session: &mut AssessmentSession,
        goal: GoalId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), SessionError> {
        session.store_mut().record_field(goal, field, value)?;
        self.after_edit(session, goal);
        Ok(())
    }

    /// Clears one answer and schedules a debounced local save.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if the assessment is read-only.
    pub fn clear(
        &self,
        session: &mut AssessmentSession,
        goal: GoalId,
        field: &str,
    ) -> Result<(), SessionError> {
        session.store_mut().clear_field(goal, field)?;
        self.after_edit(session, goal);
        Ok(())
    }

    fn after_edit(&self, session: &mut AssessmentSession, goal: GoalId) {
        session.revalidate(goal);
        let index = session
            .navigator()
            .step_of(goal)
            .unwrap_or_else(|| session.step_index());
        let key = session.draft_key(index);
        let snapshot = session.draft_snapshot(index, self.clock.now());
        drop(self.autosaver.schedule(key, snapshot));
    }

    /// Moves forward once the current step validates, then saves the step
    /// locally and pushes its sections to the server.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Navigation`; on `Incomplete` the session also
    /// carries the inline errors and banner text.
    pub async fn next(&self, session: &mut AssessmentSession) -> Result<Transition, SessionError> {
        let (store, navigator) = session.parts_mut();
        match navigator.next(store.assessment(), store.questionnaire()) {
            Ok(transition) => {
                session.clear_failures();
                self.persist_step(session, transition.from).await;
                self.push_step(session, transition.from);
                Ok(transition)
            }
            Err(NavigationError::Incomplete { failures }) => {
                debug!(failing = failures.len(), "step blocked by validation");
                session.show_failures(failures.clone(), INCOMPLETE_STEP_MESSAGE);
                Err(NavigationError::Incomplete { failures }.into())
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Moves back one step after saving the current one. Never validates.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Navigation` on the first step.
    pub async fn prev(&self, session: &mut AssessmentSession) -> Result<Transition, SessionError> {
        let transition = session.navigator_mut().prev()?;
        session.clear_failures();
        self.persist_step(session, transition.from).await;
        Ok(transition)
    }

    /// Jumps to a step (progress-bar click) after saving the current one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Navigation` for an out-of-range index.
    pub async fn go_to(
        &self,
        session: &mut AssessmentSession,
        index: usize,
    ) -> Result<Transition, SessionError> {
        let transition = session.navigator_mut().go_to(index)?;
        session.clear_failures();
        self.persist_step(session, transition.from).await;
        Ok(transition)
    }

    /// Validates every section, then scores and stores the submission and
    /// clears the project's drafts. With a server configured the finished
    /// assessment is also posted there; a failed post only changes the save
    /// status.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submit` when sections are incomplete (the
    /// session moves to the first of them), `SessionError::Submitted` when
    /// called twice, or `SessionError::Storage` if the submission cannot be
    /// written.
    pub async fn submit(
        &self,
        session: &mut AssessmentSession,
    ) -> Result<SubmissionOutcome, SessionError> {
        if session.is_submitted() {
            return Err(SessionError::Submitted);
        }
        let (store, navigator) = session.parts_mut();
        if let Err(err) = navigator.submit(store.assessment(), store.questionnaire()) {
            debug!(first = %err.first, failing = err.failures.len(), "submit blocked by validation");
            session.show_failures(err.failures.clone(), INCOMPLETE_SUBMIT_MESSAGE);
            return Err(err.into());
        }

        let now = self.clock.now();
        let mut finalized = session.assessment().clone();
        finalized.finalize(now)?;
        let scores = self.scoring.score_assessment(&finalized);
        let project = finalized.project_id();
        let upload = self.sync.enabled().then(|| FullSnapshot::of(&finalized));

        self.autosaver.cancel_all();
        let id = self
            .submissions
            .append_submission(&NewSubmission::new(finalized, now))
            .await?;
        session.store_mut().finalize(now)?;
        session.clear_failures();
        session.set_submission(id);

        let cleared = self.drafts.clear_project(project).await;
        self.autosaver.publish(SaveStatus::Saved { at: now });
        info!(%project, submission = %id, cleared, "assessment submitted");
        if let Some(upload) = upload {
            self.push_submission(session, upload);
        }

        Ok(SubmissionOutcome { id, scores })
    }

    /// Waits for server pushes started by earlier moves and submits.
    pub async fn settle(&self, session: &mut AssessmentSession) {
        for handle in session.in_flight.drain(..) {
            if let Err(err) = handle.await {
                warn!(error = %err, "server push task failed");
            }
        }
    }

    async fn persist_step(&self, session: &AssessmentSession, index: usize) {
        let key = session.draft_key(index);
        let snapshot = session.draft_snapshot(index, self.clock.now());
        self.autosaver.flush(key, &snapshot).await;
    }

    fn push_step(&self, session: &mut AssessmentSession, index: usize) {
        if !self.sync.enabled() {
            return;
        }
        let Some(step) = session.navigator().steps().get(index) else {
            return;
        };
        let assessment = session.assessment();
        let drafts: Vec<SectionDraft> = step
            .goals
            .iter()
            .filter_map(|goal| {
                assessment
                    .section(*goal)
                    .map(|section| SectionDraft::new(assessment.project_id(), *goal, section))
            })
            .collect();

        let sync = Arc::clone(&self.sync);
        let autosaver = Arc::clone(&self.autosaver);
        session.in_flight.retain(|handle| !handle.is_finished());
        session.in_flight.push(tokio::spawn(async move {
            for draft in drafts {
                if let Err(err) = sync.push_section(&draft).await {
                    warn!(section = %draft.section_id, error = %err, "could not save progress to server");
                    autosaver.publish(SaveStatus::RemoteFailed);
                }
            }
        }));
    }

    fn push_submission(&self, session: &mut AssessmentSession, upload: FullSnapshot) {
        let sync = Arc::clone(&self.sync);
        let autosaver = Arc::clone(&self.autosaver);
        session.in_flight.retain(|handle| !handle.is_finished());
        session.in_flight.push(tokio::spawn(async move {
            if let Err(err) = sync.submit_assessment(&upload).await {
                warn!(project = %upload.project_id, error = %err, "could not submit assessment to server");
                autosaver.publish(SaveStatus::RemoteFailed);
            }
        }));
    }
}
