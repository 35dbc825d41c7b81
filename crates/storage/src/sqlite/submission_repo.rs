use sdg_core::model::{ProjectId, SubmissionId};

use super::SqliteRepository;
use super::mapping::{db, encode_json, id_i64, map_submission_row, submission_id_from_i64};
use crate::repository::{NewSubmission, StorageError, SubmissionRecord, SubmissionRepository};

#[async_trait::async_trait]
impl SubmissionRepository for SqliteRepository {
    async fn append_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<SubmissionId, StorageError> {
        let assessment = &submission.assessment;
        let project_id = id_i64("project_id", assessment.project_id().value())?;
        let assessment_id = assessment
            .assessment_id()
            .map(|id| id_i64("assessment_id", id.value()))
            .transpose()?;
        let payload = encode_json(assessment)?;

        let res = sqlx::query(
            r"
                INSERT INTO submissions (project_id, assessment_id, submitted_at, payload)
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(project_id)
        .bind(assessment_id)
        .bind(submission.submitted_at)
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(db)?;

        submission_id_from_i64(res.last_insert_rowid())
    }

    async fn get_submission(
        &self,
        id: SubmissionId,
    ) -> Result<Option<SubmissionRecord>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, project_id, submitted_at, payload
                FROM submissions
                WHERE id = ?1
            ",
        )
        .bind(id_i64("submission_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;

        row.as_ref().map(map_submission_row).transpose()
    }

    async fn list_submissions(
        &self,
        project: ProjectId,
        limit: u32,
    ) -> Result<Vec<SubmissionRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, project_id, submitted_at, payload
                FROM submissions
                WHERE project_id = ?1
                ORDER BY submitted_at DESC, id DESC
                LIMIT ?2
            ",
        )
        .bind(id_i64("project_id", project.value())?)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        rows.iter().map(map_submission_row).collect()
    }
}
