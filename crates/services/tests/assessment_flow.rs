use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use sdg_core::model::{FieldValue, GoalId, ProjectId, SnapshotKey};
use sdg_core::navigator::{INCOMPLETE_STEP_MESSAGE, INCOMPLETE_SUBMIT_MESSAGE};
use sdg_core::time::fixed_now;
use sdg_core::{FieldKind, FormLayout};
use services::{
    AppServices, AssessmentConfig, AssessmentSession, Clock, DisabledDraftSync, DraftAck,
    DraftSync, DraftSyncError, FullSnapshot, SaveStatus, SectionDraft, SessionError, SubmitAck,
};
use storage::repository::{DraftRepository, Storage};

#[derive(Default)]
struct RecordingSync {
    fail: bool,
    pushed: Mutex<Vec<SectionDraft>>,
    submitted: Mutex<Vec<FullSnapshot>>,
}

#[async_trait]
impl DraftSync for RecordingSync {
    fn enabled(&self) -> bool {
        true
    }

    async fn push_section(&self, draft: &SectionDraft) -> Result<DraftAck, DraftSyncError> {
        self.pushed.lock().unwrap().push(draft.clone());
        if self.fail {
            return Err(DraftSyncError::Rejected("Internal server error".into()));
        }
        Ok(DraftAck {
            status: "success".into(),
            message: None,
            timestamp: None,
        })
    }

    async fn submit_assessment(&self, snapshot: &FullSnapshot) -> Result<SubmitAck, DraftSyncError> {
        self.submitted.lock().unwrap().push(snapshot.clone());
        if self.fail {
            return Err(DraftSyncError::Rejected("Permission denied".into()));
        }
        Ok(SubmitAck {
            success: true,
            message: None,
            redirect_url: None,
        })
    }
}

fn paged() -> AssessmentConfig {
    AssessmentConfig {
        layout: FormLayout::Paged,
        ..AssessmentConfig::default()
    }
}

fn app(storage: &Storage, clock: Clock, config: &AssessmentConfig, sync: Arc<dyn DraftSync>) -> AppServices {
    AppServices::from_storage(storage, clock, ProjectId::new(42), config, sync)
}

/// Answers every required field of the given goals with its first option.
fn answer(app: &AppServices, session: &mut AssessmentSession, goals: &[GoalId]) {
    let questionnaire = session.questionnaire().clone();
    let assessments = app.assessments();
    for goal in goals {
        let schema = questionnaire.section(*goal).unwrap();
        for field in schema.required_fields() {
            let value = match field.kind() {
                FieldKind::SingleChoice => FieldValue::text(&field.options()[0].value),
                FieldKind::MultiChoice => FieldValue::choices([field.options()[0].value.clone()]),
                FieldKind::Toggle => FieldValue::Flag(true),
                FieldKind::FreeText => FieldValue::text("Evidence on file."),
            };
            assessments
                .record(session, *goal, field.name(), value)
                .unwrap();
        }
    }
}

#[tokio::test]
async fn blocked_next_shows_inline_errors_until_fixed() {
    let storage = Storage::in_memory();
    let app = app(&storage, Clock::fixed(fixed_now()), &paged(), Arc::new(DisabledDraftSync));
    let assessments = app.assessments();
    let mut session = assessments.start(app.project_id(), None).await.unwrap();
    assert_eq!(session.current_sections(), &[1, 2, 3, 6].map(GoalId::new));

    let err = assessments.next(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::Navigation(_)));
    assert_eq!(session.step_index(), 0);
    assert_eq!(session.notice(), Some(INCOMPLETE_STEP_MESSAGE));
    assert!(session.has_field_error(GoalId::new(1), "sdg1_cost_reduction"));

    assessments
        .record(
            &mut session,
            GoalId::new(1),
            "sdg1_cost_reduction",
            FieldValue::text("cost_reduc_3"),
        )
        .unwrap();
    assert!(!session.has_field_error(GoalId::new(1), "sdg1_cost_reduction"));

    let current = session.current_sections().to_vec();
    answer(&app, &mut session, &current);
    assert!(session.notice().is_none());
    let transition = assessments.next(&mut session).await.unwrap();
    assert_eq!((transition.from, transition.to), (0, 1));
    assert_eq!(session.completion().completed.len(), 4);
}

#[tokio::test]
async fn leaving_a_step_saves_it_and_reopening_restores_it() {
    let storage = Storage::in_memory();
    let clock = Clock::fixed(fixed_now());
    let app = app(&storage, clock, &paged(), Arc::new(DisabledDraftSync));
    let assessments = app.assessments();

    let mut session = assessments.start(app.project_id(), None).await.unwrap();
    let first_page = session.current_sections().to_vec();
    answer(&app, &mut session, &first_page);
    assessments
        .record(&mut session, GoalId::new(1), "sdg1_notes", FieldValue::text("Solar roof."))
        .unwrap();
    assessments.next(&mut session).await.unwrap();

    let key = SnapshotKey::Step {
        project: Some(app.project_id()),
        step: 1,
    };
    assert!(storage.drafts.load_draft(&key).await.unwrap().is_some());

    let later = Clock::fixed(fixed_now() + Duration::hours(3));
    let reopened_app = self::app(&storage, later, &paged(), Arc::new(DisabledDraftSync));
    let reopened = reopened_app
        .assessments()
        .start(app.project_id(), None)
        .await
        .unwrap();
    assert!(reopened.restored_fields() > 0);
    for goal in &first_page {
        assert_eq!(
            reopened.assessment().section(*goal),
            session.assessment().section(*goal)
        );
    }
}

#[tokio::test]
async fn drafts_older_than_a_day_are_not_restored() {
    let storage = Storage::in_memory();
    let app = app(
        &storage,
        Clock::fixed(fixed_now()),
        &AssessmentConfig::default(),
        Arc::new(DisabledDraftSync),
    );
    let assessments = app.assessments();
    let mut session = assessments.start(app.project_id(), None).await.unwrap();
    answer(&app, &mut session, &[GoalId::new(1)]);
    assessments.next(&mut session).await.unwrap();

    let stale = Clock::fixed(fixed_now() + Duration::hours(25));
    let reopened = self::app(&storage, stale, &AssessmentConfig::default(), Arc::new(DisabledDraftSync))
        .assessments()
        .start(app.project_id(), None)
        .await
        .unwrap();
    assert_eq!(reopened.restored_fields(), 0);
    assert!(reopened.assessment().section(GoalId::new(1)).unwrap().is_blank());
}

#[tokio::test]
async fn successful_moves_push_sections_to_the_server() {
    let storage = Storage::in_memory();
    let sync = Arc::new(RecordingSync::default());
    let app = app(&storage, Clock::fixed(fixed_now()), &paged(), sync.clone());
    let assessments = app.assessments();
    let mut session = assessments.start(app.project_id(), None).await.unwrap();

    let _ = assessments.next(&mut session).await;
    assessments.settle(&mut session).await;
    assert!(sync.pushed.lock().unwrap().is_empty());

    let page = session.current_sections().to_vec();
    answer(&app, &mut session, &page);
    assessments.next(&mut session).await.unwrap();
    assessments.settle(&mut session).await;

    let pushed = sync.pushed.lock().unwrap();
    let sections: Vec<GoalId> = pushed.iter().map(|draft| draft.section_id).collect();
    assert_eq!(sections, page);
    assert!(pushed.iter().all(|draft| draft.project_id == ProjectId::new(42)));
}

#[tokio::test]
async fn failed_push_is_reported_without_blocking() {
    let storage = Storage::in_memory();
    let sync = Arc::new(RecordingSync {
        fail: true,
        ..RecordingSync::default()
    });
    let app = app(&storage, Clock::fixed(fixed_now()), &paged(), sync.clone());
    let assessments = app.assessments();
    let status = assessments.autosaver().subscribe();
    let mut session = assessments.start(app.project_id(), None).await.unwrap();

    let page = session.current_sections().to_vec();
    answer(&app, &mut session, &page);
    assessments.next(&mut session).await.unwrap();
    assessments.settle(&mut session).await;

    assert_eq!(*status.borrow(), SaveStatus::RemoteFailed);
    assert!(status.borrow().message().unwrap().starts_with("Error saving progress"));
    assert_eq!(session.step_index(), 1);
    assert_eq!(sync.pushed.lock().unwrap().len(), page.len());
}

#[tokio::test]
async fn incomplete_submit_jumps_to_first_failing_step() {
    let storage = Storage::in_memory();
    let app = app(&storage, Clock::fixed(fixed_now()), &paged(), Arc::new(DisabledDraftSync));
    let assessments = app.assessments();
    let mut session = assessments.start(app.project_id(), None).await.unwrap();

    let first_pages: Vec<GoalId> = session.navigator().steps()[..2]
        .iter()
        .flat_map(|step| step.goals.clone())
        .collect();
    answer(&app, &mut session, &first_pages);
    assessments.go_to(&mut session, 3).await.unwrap();

    let err = assessments.submit(&mut session).await.unwrap_err();
    let SessionError::Submit(err) = err else {
        panic!("expected submit error, got {err:?}");
    };
    assert_eq!(err.first, GoalId::new(7));
    assert_eq!(session.step_index(), 2);
    assert_eq!(session.notice(), Some(INCOMPLETE_SUBMIT_MESSAGE));
    assert!(!session.is_submitted());
}

#[tokio::test]
async fn submit_scores_stores_and_clears_drafts() {
    let storage = Storage::sqlite("sqlite:file:memdb_assessment_submit?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let app = app(&storage, Clock::fixed(fixed_now()), &paged(), Arc::new(DisabledDraftSync));
    let assessments = app.assessments();
    let mut session = assessments.start(app.project_id(), None).await.unwrap();

    let all = session.questionnaire().goals();
    answer(&app, &mut session, &all);
    assessments
        .record(
            &mut session,
            GoalId::new(1),
            "sdg1_cost_reduction",
            FieldValue::text("cost_reduc_3"),
        )
        .unwrap();
    assessments.next(&mut session).await.unwrap();

    let outcome = assessments.submit(&mut session).await.expect("submit");
    assert_eq!(outcome.scores.len(), 17);
    assert_eq!(outcome.scores[0].total_score, 5.0);
    assert!(session.is_submitted());
    assert_eq!(session.submission(), Some(outcome.id));

    for key in session.draft_keys() {
        assert!(storage.drafts.load_draft(&key).await.unwrap().is_none());
    }

    let again = assessments.submit(&mut session).await.unwrap_err();
    assert!(matches!(again, SessionError::Submitted));
    let late_edit = assessments.record(
        &mut session,
        GoalId::new(2),
        "sdg2_food_integration",
        FieldValue::text("study"),
    );
    assert!(late_edit.is_err());

    let report = app.results().report(outcome.id).await.unwrap();
    assert_eq!(report.report.entries, outcome.scores);
    let recent = app.results().recent(app.project_id(), 5).await.unwrap();
    assert_eq!(recent[0].id, outcome.id);
}

#[tokio::test]
async fn submit_posts_the_finished_assessment_to_the_server() {
    let storage = Storage::in_memory();
    let sync = Arc::new(RecordingSync::default());
    let app = app(&storage, Clock::fixed(fixed_now()), &paged(), sync.clone());
    let assessments = app.assessments();
    let status = assessments.autosaver().subscribe();
    let mut session = assessments.start(app.project_id(), None).await.unwrap();

    let all = session.questionnaire().goals();
    answer(&app, &mut session, &all);
    assessments.submit(&mut session).await.expect("submit");
    assessments.settle(&mut session).await;

    let submitted = sync.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].action, "submit");
    assert_eq!(submitted[0].project_id, ProjectId::new(42));
    assert_eq!(submitted[0].assessment_data.len(), 17);
    assert!(sync.pushed.lock().unwrap().is_empty());
    assert!(matches!(*status.borrow(), SaveStatus::Saved { .. }));
}

#[tokio::test]
async fn failed_server_submit_keeps_the_local_submission() {
    let storage = Storage::in_memory();
    let sync = Arc::new(RecordingSync {
        fail: true,
        ..RecordingSync::default()
    });
    let app = app(&storage, Clock::fixed(fixed_now()), &paged(), sync.clone());
    let assessments = app.assessments();
    let status = assessments.autosaver().subscribe();
    let mut session = assessments.start(app.project_id(), None).await.unwrap();

    let all = session.questionnaire().goals();
    answer(&app, &mut session, &all);
    let outcome = assessments.submit(&mut session).await.expect("submit");
    assessments.settle(&mut session).await;

    assert_eq!(sync.submitted.lock().unwrap().len(), 1);
    assert_eq!(*status.borrow(), SaveStatus::RemoteFailed);
    assert!(session.is_submitted());
    let report = app.results().report(outcome.id).await.unwrap();
    assert_eq!(report.report.entries, outcome.scores);
}
