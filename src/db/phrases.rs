//! Phrase persistence operations
//!
//! One document per user id holding the latest saved note sequence. Saves
//! replace the whole sequence in a single UPSERT; reads of an absent record
//! return an empty sequence rather than an error.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::StoreError;
use crate::notation::NoteEvent;

/// Load the stored note sequence for a user.
///
/// Returns an empty sequence when no record exists; fails only on
/// transport errors or an undecodable stored record.
pub async fn load(pool: &SqlitePool, user_id: &str) -> Result<Vec<NoteEvent>, StoreError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT notes FROM phrases WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some((notes_json,)) => {
            serde_json::from_str(&notes_json).map_err(|e| StoreError::CorruptRecord {
                user_id: user_id.to_string(),
                reason: e.to_string(),
            })
        }
        None => Ok(Vec::new()),
    }
}

/// Overwrite the stored note sequence for a user.
///
/// An empty user id is a caller precondition violation and fails before
/// the store is contacted. The write is one UPSERT; SQLite's atomicity
/// guarantees the prior value survives a failed write.
pub async fn save(
    pool: &SqlitePool,
    user_id: &str,
    notes: &[NoteEvent],
) -> Result<(), StoreError> {
    if user_id.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "user id must not be empty".to_string(),
        ));
    }

    let notes_json = serde_json::to_string(notes)
        .map_err(|e| StoreError::InvalidInput(format!("could not encode notes: {}", e)))?;

    sqlx::query(
        "INSERT INTO phrases (user_id, notes, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(user_id) DO UPDATE SET notes = excluded.notes, updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(&notes_json)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    tracing::debug!(user_id, notes = notes.len(), "Phrase saved");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    fn sample_sequence() -> Vec<NoteEvent> {
        vec![
            NoteEvent {
                note: "A".to_string(),
                duration: 1,
            },
            NoteEvent {
                note: "C#".to_string(),
                duration: 4,
            },
        ]
    }

    #[tokio::test]
    async fn test_load_absent_record_returns_empty() {
        let pool = setup_test_db().await;

        let notes = load(&pool, "nobody").await.unwrap();

        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let pool = setup_test_db().await;
        let notes = sample_sequence();

        save(&pool, "user-1", &notes).await.unwrap();
        let loaded = load(&pool, "user-1").await.unwrap();

        assert_eq!(loaded, notes);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_sequence() {
        let pool = setup_test_db().await;

        save(&pool, "user-1", &sample_sequence()).await.unwrap();

        let replacement = vec![NoteEvent {
            note: "G".to_string(),
            duration: 2,
        }];
        save(&pool, "user-1", &replacement).await.unwrap();

        let loaded = load(&pool, "user-1").await.unwrap();
        assert_eq!(loaded, replacement);

        // Replacement, not accumulation: still one row.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM phrases")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_save_empty_user_id_fails_without_write() {
        let pool = setup_test_db().await;

        let err = save(&pool, "", &sample_sequence()).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        let err = save(&pool, "   ", &sample_sequence()).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM phrases")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "Precondition failure must not write anything");
    }

    #[tokio::test]
    async fn test_save_empty_sequence_is_allowed() {
        let pool = setup_test_db().await;

        save(&pool, "user-1", &[]).await.unwrap();
        let loaded = load(&pool, "user-1").await.unwrap();

        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_record_fails() {
        let pool = setup_test_db().await;

        sqlx::query("INSERT INTO phrases (user_id, notes, updated_at) VALUES ('user-1', 'not json', '')")
            .execute(&pool)
            .await
            .unwrap();

        let err = load(&pool, "user-1").await.unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord { .. }));
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let pool = setup_test_db().await;

        save(&pool, "user-1", &sample_sequence()).await.unwrap();

        let other = load(&pool, "user-2").await.unwrap();
        assert!(other.is_empty());
    }
}
