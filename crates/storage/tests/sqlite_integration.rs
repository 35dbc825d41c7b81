use chrono::Duration;
use sdg_core::model::{
    Assessment, AssessmentId, FieldValue, GoalId, ProjectId, Snapshot, SnapshotKey,
    canonical_goals,
};
use sdg_core::time::fixed_now;
use std::collections::BTreeMap;
use storage::repository::{DraftRepository, NewSubmission, SubmissionRepository};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn snapshot() -> Snapshot {
    let mut data = BTreeMap::new();
    data.insert(
        "sdg1_cost_reduction".to_string(),
        FieldValue::text("cost_reduc_3"),
    );
    data.insert(
        "sdg3_actions".to_string(),
        FieldValue::choices(["materials", "air_quality"]),
    );
    data.insert("sdg3_notes".to_string(), FieldValue::text("HEPA filters"));
    Snapshot::new(fixed_now(), data)
}

#[tokio::test]
async fn sqlite_draft_roundtrip_and_project_cleanup() {
    let repo = connect("memdb_drafts").await;
    let project = ProjectId::new(11);
    let single = SnapshotKey::Assessment {
        project,
        assessment: Some(AssessmentId::new(5)),
    };
    let step = SnapshotKey::Step {
        project: Some(project),
        step: 2,
    };
    let anonymous = SnapshotKey::Step {
        project: None,
        step: 2,
    };

    repo.save_draft(&single, &snapshot()).await.unwrap();
    repo.save_draft(&step, &snapshot()).await.unwrap();
    repo.save_draft(&anonymous, &snapshot()).await.unwrap();

    let loaded = repo.load_draft(&single).await.unwrap().expect("draft");
    assert_eq!(loaded, snapshot());

    let mut newer = snapshot();
    newer.timestamp = fixed_now() + Duration::minutes(3);
    repo.save_draft(&single, &newer).await.unwrap();
    assert_eq!(repo.load_draft(&single).await.unwrap(), Some(newer));

    assert_eq!(repo.delete_project_drafts(project).await.unwrap(), 2);
    assert!(repo.load_draft(&step).await.unwrap().is_none());
    assert!(repo.load_draft(&anonymous).await.unwrap().is_some());
}

#[tokio::test]
async fn sqlite_submission_roundtrip_keeps_sections() {
    let repo = connect("memdb_submissions").await;
    let project = ProjectId::new(2);

    let mut assessment = Assessment::new(project, None, canonical_goals()).unwrap();
    assessment
        .set_input(
            GoalId::new(3),
            "sdg3_actions",
            FieldValue::choices(["materials", "soil_cleaning"]),
        )
        .unwrap();
    assessment
        .set_input(GoalId::new(3), "sdg3_health_summary", FieldValue::text("4"))
        .unwrap();
    assessment.set_notes(GoalId::new(3), "Soil cleaned").unwrap();
    assessment.finalize(fixed_now()).unwrap();

    let first = repo
        .append_submission(&NewSubmission::new(assessment.clone(), fixed_now()))
        .await
        .unwrap();
    let second = repo
        .append_submission(&NewSubmission::new(
            assessment.clone(),
            fixed_now() + Duration::days(2),
        ))
        .await
        .unwrap();

    let fetched = repo.get_submission(first).await.unwrap().expect("stored");
    assert_eq!(fetched.assessment, assessment);
    assert_eq!(fetched.submitted_at, fixed_now());

    let listed = repo.list_submissions(project, 1).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, second);

    assert!(
        repo.list_submissions(ProjectId::new(99), 10)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn migrations_are_recorded_and_idempotent() {
    let url = "sqlite:file:memdb_schema_version?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    assert_eq!(repo.schema_version().await.unwrap(), 0);
    repo.migrate().await.expect("migrate");
    assert_eq!(repo.schema_version().await.unwrap(), 2);
    repo.migrate().await.expect("second migrate is a no-op");
    assert_eq!(repo.schema_version().await.unwrap(), 2);
}

#[tokio::test]
async fn newer_schema_is_refused() {
    let url = "sqlite:file:memdb_schema_newer?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (99, '2030-01-01T00:00:00Z')")
        .execute(repo.pool())
        .await
        .unwrap();

    let err = repo.migrate().await.unwrap_err();
    assert!(matches!(
        err,
        storage::sqlite::SqliteInitError::SchemaTooNew { found: 99, supported: 2 }
    ));
}
