use std::collections::BTreeMap;
use std::sync::Arc;

use sdg_core::FormLayout;
use sdg_core::model::{
    Assessment, FieldValue, GoalId, ProjectId, Snapshot, SnapshotKey, SubmissionId,
    canonical_goals,
};
use sdg_core::time::fixed_now;
use storage::repository::{
    InMemoryRepository, NewSubmission, Storage, StorageError, SubmissionRecord,
    SubmissionRepository,
};

use super::test_harness::{TEST_PROJECT, ViewKind, setup_view_harness, setup_view_harness_with};

fn submitted() -> Assessment {
    let mut assessment =
        Assessment::new(ProjectId::new(TEST_PROJECT), None, canonical_goals()).unwrap();
    assessment
        .set_input(GoalId::new(1), "sdg1_cost_reduction", FieldValue::text("cost_reduc_3"))
        .unwrap();
    assessment.finalize(fixed_now()).unwrap();
    assessment
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::Home);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Start assessment"), "missing start link in {html}");
    assert!(html.contains("No submissions yet."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_recent_submissions() {
    let mut harness = setup_view_harness(ViewKind::Home);
    harness
        .storage
        .submissions
        .append_submission(&NewSubmission::new(submitted(), fixed_now()))
        .await
        .expect("append submission");

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("2023-11-14 22:13 UTC"), "missing submission date in {html}");
    assert!(html.contains("Needs Improvement"), "missing level badge in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_smoke_renders_first_step() {
    let mut harness = setup_view_harness(ViewKind::Assessment);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("SDG 1: No Poverty"), "missing section title in {html}");
    assert!(html.contains("Step 1 of 17"), "missing position in {html}");
    assert!(html.contains("bg-danger"), "missing progress tone in {html}");
    assert!(html.contains("Next"), "missing next button in {html}");
    assert!(!html.contains("Previous"), "first step has no back button: {html}");
    assert!(html.contains("0/500"), "missing evidence counter in {html}");
    assert!(
        html.contains("Evidence strength: Not started"),
        "missing evidence meter in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_smoke_restores_saved_answers() {
    let storage = Storage::in_memory();
    let mut data = BTreeMap::new();
    data.insert(
        "sdg1_cost_reduction".to_string(),
        FieldValue::text("cost_reduc_4"),
    );
    data.insert(
        "sdg1_notes".to_string(),
        FieldValue::text("Solar roof commissioned in March, invoices attached."),
    );
    storage
        .drafts
        .save_draft(
            &SnapshotKey::Assessment {
                project: ProjectId::new(TEST_PROJECT),
                assessment: None,
            },
            &Snapshot::new(fixed_now(), data),
        )
        .await
        .expect("save draft");

    let mut harness = setup_view_harness_with(ViewKind::Assessment, storage, FormLayout::SinglePage);
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Your saved answers have been restored."),
        "missing restore banner in {html}"
    );
    assert!(html.contains("52/500"), "restored notes not counted in {html}");
    assert!(
        html.contains("Evidence strength: Basic evidence"),
        "missing meter band in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_smoke_groups_goals_per_page() {
    let mut harness =
        setup_view_harness_with(ViewKind::Assessment, Storage::in_memory(), FormLayout::Paged);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Step 1 of 5"), "missing position in {html}");
    assert!(html.contains("SDG 6:"), "missing grouped section in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_renders_dashboard() {
    let storage = Storage::in_memory();
    let id = storage
        .submissions
        .append_submission(&NewSubmission::new(submitted(), fixed_now()))
        .await
        .expect("append submission");

    let mut harness =
        setup_view_harness_with(ViewKind::Results(id.value()), storage, FormLayout::SinglePage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("radar-chart"), "missing radar chart in {html}");
    assert!(html.contains("bar-chart"), "missing bar chart in {html}");
    assert!(html.contains("Breakdown"), "missing breakdown in {html}");
    assert!(html.contains("Needs Improvement"), "missing level label in {html}");
    assert!(html.contains("https://sdgs.un.org/goals/goal"), "missing recommendation link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_renders_not_found() {
    let mut harness = setup_view_harness(ViewKind::Results(404));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("could not be found"), "missing not-found message in {html}");
}

struct FailingSubmissions;

#[async_trait::async_trait]
impl SubmissionRepository for FailingSubmissions {
    async fn append_submission(
        &self,
        _submission: &NewSubmission,
    ) -> Result<SubmissionId, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_submission(
        &self,
        _id: SubmissionId,
    ) -> Result<Option<SubmissionRecord>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_submissions(
        &self,
        _project: ProjectId,
        _limit: u32,
    ) -> Result<Vec<SubmissionRecord>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_error_state() {
    let storage = Storage {
        drafts: Arc::new(InMemoryRepository::new()),
        submissions: Arc::new(FailingSubmissions),
    };
    let mut harness = setup_view_harness_with(ViewKind::Home, storage, FormLayout::SinglePage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
}
