//! Database access for notekeep

pub mod phrases;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;
use thiserror::Error;

/// Phrase store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller precondition violation, raised before touching the store
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored record did not decode as a note sequence
    #[error("Corrupt record for user {user_id}: {reason}")]
    CorruptRecord { user_id: String, reason: String },
}

/// Initialize database connection pool
///
/// Opens (or creates) the SQLite file and ensures the phrases table exists.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create notekeep tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    // One row per user holding the JSON-encoded note sequence. The whole
    // sequence is replaced on every save; last writer wins.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS phrases (
            user_id TEXT PRIMARY KEY,
            notes TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (phrases)");

    Ok(())
}
