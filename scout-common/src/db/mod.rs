//! Database initialization
//!
//! Creates the database file and the `requests` table on first run.
//! Schema creation is additive-only: `CREATE TABLE IF NOT EXISTS` makes
//! startup idempotent, there are no migrations.

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

pub mod models;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePool::connect(&db_url).await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    create_requests_table(&pool).await?;

    Ok(pool)
}

/// Create the `requests` table (idempotent)
///
/// Public so tests can build the schema on in-memory pools.
pub async fn create_requests_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS requests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            url TEXT NOT NULL UNIQUE,
            thumbnail_url TEXT,
            source TEXT,
            date_requested TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            status TEXT NOT NULL DEFAULT 'Pending'
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn init_creates_schema() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("requests.db");

        let pool = init_database(&db_path).await.unwrap();

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM requests")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("requests.db");

        let pool = init_database(&db_path).await.unwrap();
        sqlx::query("INSERT INTO requests (title, url) VALUES ('Dragon', 'http://x/1')")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        // Reopening must keep existing rows
        let pool = init_database(&db_path).await.unwrap();
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM requests")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn create_requests_table_on_memory_pool() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        create_requests_table(&pool).await.unwrap();
        // Safe to call twice
        create_requests_table(&pool).await.unwrap();
    }
}
