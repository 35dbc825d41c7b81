use sdg_core::model::{ProjectId, Snapshot, SnapshotKey};

use super::SqliteRepository;
use super::mapping::{db, encode_json, id_i64, map_snapshot_row};
use crate::repository::{DraftRepository, StorageError};

#[async_trait::async_trait]
impl DraftRepository for SqliteRepository {
    async fn save_draft(&self, key: &SnapshotKey, snapshot: &Snapshot) -> Result<(), StorageError> {
        let project = key
            .project()
            .map(|p| id_i64("project_id", p.value()))
            .transpose()?;
        let payload = encode_json(snapshot)?;

        sqlx::query(
            r"
                INSERT INTO drafts (storage_key, project_id, saved_at, payload)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(storage_key) DO UPDATE SET
                    project_id = excluded.project_id,
                    saved_at = excluded.saved_at,
                    payload = excluded.payload
            ",
        )
        .bind(key.to_string())
        .bind(project)
        .bind(snapshot.timestamp)
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(db)?;

        Ok(())
    }

    async fn load_draft(&self, key: &SnapshotKey) -> Result<Option<Snapshot>, StorageError> {
        let row = sqlx::query("SELECT payload FROM drafts WHERE storage_key = ?1")
            .bind(key.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;

        row.as_ref().map(map_snapshot_row).transpose()
    }

    async fn delete_draft(&self, key: &SnapshotKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM drafts WHERE storage_key = ?1")
            .bind(key.to_string())
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(())
    }

    async fn delete_project_drafts(&self, project: ProjectId) -> Result<u64, StorageError> {
        let res = sqlx::query("DELETE FROM drafts WHERE project_id = ?1")
            .bind(id_i64("project_id", project.value())?)
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(res.rows_affected())
    }
}
