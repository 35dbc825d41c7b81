use sdg_core::model::{Assessment, ProjectId, Snapshot, SubmissionId};
use sqlx::Row;

use crate::repository::{StorageError, SubmissionRecord};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Maps a failed draft or submission query onto the repository error kinds.
pub(crate) fn db(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::RowNotFound => StorageError::NotFound,
        sqlx::Error::Database(ref inner) if inner.is_unique_violation() => StorageError::Conflict,
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::TypeNotFound { .. } => {
            StorageError::Serialization(e.to_string())
        }
        other => StorageError::Connection(other.to_string()),
    }
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn project_id_from_i64(v: i64) -> Result<ProjectId, StorageError> {
    Ok(ProjectId::new(i64_to_u64("project_id", v)?))
}

pub(crate) fn submission_id_from_i64(v: i64) -> Result<SubmissionId, StorageError> {
    Ok(SubmissionId::new(i64_to_u64("submission_id", v)?))
}

pub(crate) fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(ser)
}

pub(crate) fn map_snapshot_row(row: &sqlx::sqlite::SqliteRow) -> Result<Snapshot, StorageError> {
    let payload: String = row.try_get("payload").map_err(ser)?;
    serde_json::from_str(&payload).map_err(ser)
}

pub(crate) fn map_submission_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<SubmissionRecord, StorageError> {
    let id = submission_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let project_id = project_id_from_i64(row.try_get::<i64, _>("project_id").map_err(ser)?)?;
    let submitted_at = row.try_get("submitted_at").map_err(ser)?;
    let payload: String = row.try_get("payload").map_err(ser)?;
    let assessment: Assessment = serde_json::from_str(&payload).map_err(ser)?;
    if assessment.project_id() != project_id {
        return Err(StorageError::Serialization(format!(
            "submission {id} payload belongs to project {}",
            assessment.project_id()
        )));
    }
    Ok(SubmissionRecord {
        id,
        project_id,
        assessment,
        submitted_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_and_decode_failures_keep_their_kind() {
        assert!(matches!(db(sqlx::Error::RowNotFound), StorageError::NotFound));
        assert!(matches!(
            db(sqlx::Error::Decode("bad timestamp".into())),
            StorageError::Serialization(_)
        ));
        assert!(matches!(
            db(sqlx::Error::PoolTimedOut),
            StorageError::Connection(_)
        ));
    }
}
