//! SQLite audit log of request/response pairs.
//!
//! One row per handled model request. Rows are immutable: there is no update
//! or delete path, only insert and a bounded most-recent-first listing.

use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use tracing::info;

/// Rows returned by GET /api/logs.
pub const RECENT_LIMIT: i64 = 20;

/// A persisted request/response audit record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Interaction {
    pub id: i64,
    /// "questions" or "email".
    pub kind: String,
    pub scenario: String,
    pub cefr_level: String,
    pub request_json: String,
    pub response_json: String,
    pub created_at: String,
}

/// Open the connection pool. `?mode=rwc` in the URL creates the database
/// file if it doesn't exist.
pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    connect_with_pool_size(url, 5).await
}

/// Pool-size variant. In-memory databases need a single connection, since
/// every new connection would otherwise see its own empty database.
pub async fn connect_with_pool_size(url: &str, size: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(size)
        .connect_with(options)
        .await?;
    info!(target: "audit", %url, pool_size = size, "Connected to database");
    Ok(pool)
}

/// Create the interactions table if absent. Called once at startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            scenario TEXT NOT NULL,
            cefr_level TEXT NOT NULL DEFAULT '',
            request_json TEXT NOT NULL,
            response_json TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Append one audit row with a server-assigned timestamp.
pub async fn record_interaction(
    pool: &SqlitePool,
    kind: &str,
    scenario: &str,
    cefr_level: &str,
    request_json: &str,
    response_json: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO interactions (kind, scenario, cefr_level, request_json, response_json)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(kind)
    .bind(scenario)
    .bind(cefr_level)
    .bind(request_json)
    .bind(response_json)
    .execute(pool)
    .await?;
    Ok(())
}

/// Most-recent-first listing, bounded by `limit`.
pub async fn recent_interactions(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<Interaction>, sqlx::Error> {
    sqlx::query_as::<_, Interaction>(
        r#"
        SELECT id, kind, scenario, cefr_level, request_json, response_json, created_at
        FROM interactions
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = connect_with_pool_size("sqlite::memory:", 1).await.unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn insert_and_list_roundtrip() {
        let pool = test_pool().await;
        record_interaction(&pool, "email", "job application", "B2", "{}", "{\"rating\":3}")
            .await
            .unwrap();

        let rows = recent_interactions(&pool, RECENT_LIMIT).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "email");
        assert_eq!(rows[0].scenario, "job application");
        assert_eq!(rows[0].cefr_level, "B2");
        assert_eq!(rows[0].response_json, "{\"rating\":3}");
        assert!(!rows[0].created_at.is_empty());
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_bounded() {
        let pool = test_pool().await;
        for i in 1..=25 {
            record_interaction(&pool, "questions", &format!("scenario {}", i), "A2", "{}", "{}")
                .await
                .unwrap();
        }

        let rows = recent_interactions(&pool, RECENT_LIMIT).await.unwrap();
        assert_eq!(rows.len(), 20);
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let expected: Vec<i64> = (6..=25).rev().collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let pool = test_pool().await;
        init_schema(&pool).await.unwrap();
        record_interaction(&pool, "email", "s", "A1", "{}", "{}").await.unwrap();
        assert_eq!(recent_interactions(&pool, 5).await.unwrap().len(), 1);
    }
}
