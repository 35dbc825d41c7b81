use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use super::SqliteInitError;

pub(super) struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

/// Schema history, oldest first. Versions are never edited once released.
pub(super) const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "drafts and submissions",
        statements: &[
            r"
                CREATE TABLE IF NOT EXISTS drafts (
                    storage_key TEXT PRIMARY KEY,
                    project_id INTEGER,
                    saved_at TEXT NOT NULL,
                    payload TEXT NOT NULL
                );
            ",
            r"
                CREATE TABLE IF NOT EXISTS submissions (
                    id INTEGER PRIMARY KEY,
                    project_id INTEGER NOT NULL,
                    assessment_id INTEGER,
                    submitted_at TEXT NOT NULL,
                    payload TEXT NOT NULL
                );
            ",
            r"
                CREATE INDEX IF NOT EXISTS idx_drafts_project
                    ON drafts (project_id);
            ",
            r"
                CREATE INDEX IF NOT EXISTS idx_submissions_project_submitted
                    ON submissions (project_id, submitted_at);
            ",
        ],
    },
    Migration {
        version: 2,
        name: "draft expiry index",
        statements: &[r"
                CREATE INDEX IF NOT EXISTS idx_drafts_saved_at
                    ON drafts (saved_at);
            "],
    },
];

/// Highest version in [`MIGRATIONS`].
pub(super) fn latest_version() -> i64 {
    MIGRATIONS.iter().map(|m| m.version).max().unwrap_or(0)
}

/// Applies pending schema versions, each inside its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    for migration in MIGRATIONS {
        let applied = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(migration.version)
            .fetch_optional(pool)
            .await?
            .is_some();
        if applied {
            continue;
        }
        apply(pool, migration)
            .await
            .map_err(|source| SqliteInitError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        info!(version = migration.version, name = migration.name, "applied schema migration");
    }

    Ok(())
}

async fn apply(pool: &SqlitePool, migration: &Migration) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in migration.statements {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(migration.version)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;
    tx.commit().await
}
