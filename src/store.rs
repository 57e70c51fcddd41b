//! Submission persistence
//!
//! A single `submissions` table backed by SQLite through sqlx. Records are
//! insert-only: no update or delete exists anywhere on this surface.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::debug;

use crate::error::VigilError;
use crate::submission::{NewSubmission, Submission};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS submissions (
        id                 INTEGER PRIMARY KEY AUTOINCREMENT,
        answer             TEXT    NOT NULL,
        time_spent_seconds INTEGER NOT NULL,
        mouse_moves        INTEGER NOT NULL,
        hover_count        INTEGER NOT NULL,
        risk_score         REAL    NOT NULL,
        created_at         TEXT    NOT NULL
    );
";

/// SQLite-backed store for submissions.
#[derive(Debug, Clone)]
pub struct SubmissionStore {
    pool: SqlitePool,
}

impl SubmissionStore {
    /// Open (creating if missing) the database at `url` and ensure the
    /// schema exists.
    pub async fn open(url: &str) -> Result<Self, VigilError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // One connection: there is a single logical writer, and it keeps
        // an in-memory database from being dropped between acquires.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Ephemeral in-memory store, used by tests and the default dev server.
    pub async fn in_memory() -> Result<Self, VigilError> {
        Self::open("sqlite::memory:").await
    }

    /// Persist a validated payload, assigning id and creation timestamp,
    /// and return the stored record.
    pub async fn create(&self, payload: &NewSubmission) -> Result<Submission, VigilError> {
        let created_at = Utc::now();
        let stored = sqlx::query_as::<_, Submission>(
            "INSERT INTO submissions
                 (answer, time_spent_seconds, mouse_moves, hover_count, risk_score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, answer, time_spent_seconds, mouse_moves, hover_count, risk_score, created_at",
        )
        .bind(&payload.answer)
        .bind(payload.time_spent_seconds)
        .bind(payload.mouse_moves)
        .bind(payload.hover_count)
        .bind(payload.risk_score)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = stored.id, risk_score = stored.risk_score, "submission stored");
        Ok(stored)
    }

    /// All submissions, ascending by creation time. No pagination, no
    /// filtering; `id` breaks ties between same-instant inserts.
    pub async fn list(&self) -> Result<Vec<Submission>, VigilError> {
        let rows = sqlx::query_as::<_, Submission>(
            "SELECT id, answer, time_spent_seconds, mouse_moves, hover_count, risk_score, created_at
             FROM submissions
             ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(answer: &str, risk_score: f64) -> NewSubmission {
        NewSubmission {
            answer: answer.to_string(),
            time_spent_seconds: 40,
            mouse_moves: 160,
            hover_count: 9,
            risk_score,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let store = SubmissionStore::in_memory().await.unwrap();
        let stored = store.create(&payload("first", 0.0)).await.unwrap();

        assert_eq!(stored.id, 1);
        assert_eq!(stored.answer, "first");
        assert!(stored.created_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let store = SubmissionStore::in_memory().await.unwrap();
        let a = store.create(&payload("a", 0.0)).await.unwrap();
        let b = store.create(&payload("b", 0.4)).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let store = SubmissionStore::in_memory().await.unwrap();
        store.create(&payload("earlier", 0.3)).await.unwrap();
        let created = store.create(&payload("latest", 0.7)).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed.last().unwrap(), &created);
    }

    #[tokio::test]
    async fn test_list_orders_by_creation_ascending() {
        let store = SubmissionStore::in_memory().await.unwrap();
        for i in 0..5 {
            store.create(&payload(&format!("answer {}", i), 0.0)).await.unwrap();
        }

        let listed = store.list().await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        for pair in listed.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let store = SubmissionStore::in_memory().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
