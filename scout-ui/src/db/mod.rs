//! Request repository
//!
//! Single-table CRUD over the `requests` table. Rows are inserted Pending,
//! transitioned to Printed exactly once, and never deleted.

use scout_common::db::models::Request;
use scout_common::Result;
use sqlx::SqlitePool;

/// Outcome of an insert attempt
///
/// A url collision is "already requested", not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
}

/// Insert a Pending request; `date_requested` defaults to now (SQLite side).
pub async fn add_request(
    pool: &SqlitePool,
    title: &str,
    url: &str,
    thumbnail_url: Option<&str>,
    source: Option<&str>,
) -> Result<AddOutcome> {
    let result = sqlx::query(
        "INSERT INTO requests (title, url, thumbnail_url, source) VALUES (?, ?, ?, ?)",
    )
    .bind(title)
    .bind(url)
    .bind(thumbnail_url)
    .bind(source)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(AddOutcome::Added),
        Err(sqlx::Error::Database(e))
            if matches!(e.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            Ok(AddOutcome::Duplicate)
        }
        Err(e) => Err(e.into()),
    }
}

/// All Pending requests, oldest first (fairness for the reviewer).
pub async fn list_pending(pool: &SqlitePool) -> Result<Vec<Request>> {
    let requests = sqlx::query_as::<_, Request>(
        "SELECT id, title, url, thumbnail_url, source, date_requested, status \
         FROM requests WHERE status = 'Pending' ORDER BY date_requested ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

/// Transition a request to Printed.
///
/// An absent id is a no-op: the row was already handled.
pub async fn mark_printed(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("UPDATE requests SET status = 'Printed' WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_common::db::create_requests_table;
    use scout_common::db::models::RequestStatus;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        create_requests_table(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn duplicate_url_keeps_one_row() {
        let pool = test_pool().await;

        let first = add_request(&pool, "Dragon", "http://x/1", None, Some("x"))
            .await
            .unwrap();
        assert_eq!(first, AddOutcome::Added);

        let second = add_request(&pool, "Dragon again", "http://x/1", None, Some("x"))
            .await
            .unwrap();
        assert_eq!(second, AddOutcome::Duplicate);

        let pending = list_pending(&pool).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "Dragon");
        assert_eq!(pending[0].status(), Some(RequestStatus::Pending));
    }

    #[tokio::test]
    async fn list_pending_on_empty_store() {
        let pool = test_pool().await;
        assert!(list_pending(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_pending_orders_oldest_first() {
        let pool = test_pool().await;

        add_request(&pool, "Newer", "http://x/new", None, None)
            .await
            .unwrap();
        add_request(&pool, "Older", "http://x/old", None, None)
            .await
            .unwrap();

        // Pin distinct timestamps; same-second inserts would tie otherwise
        sqlx::query("UPDATE requests SET date_requested = '2026-01-02 10:00:00' WHERE url = 'http://x/new'")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE requests SET date_requested = '2026-01-01 10:00:00' WHERE url = 'http://x/old'")
            .execute(&pool)
            .await
            .unwrap();

        let pending = list_pending(&pool).await.unwrap();
        let titles: Vec<&str> = pending.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Older", "Newer"]);
    }

    #[tokio::test]
    async fn mark_printed_removes_from_pending() {
        let pool = test_pool().await;

        add_request(&pool, "Dragon", "http://x/1", Some("http://x/t.png"), Some("x"))
            .await
            .unwrap();
        let id = list_pending(&pool).await.unwrap()[0].id;

        mark_printed(&pool, id).await.unwrap();
        assert!(list_pending(&pool).await.unwrap().is_empty());

        // Row still exists, just Printed
        let status: String = sqlx::query_scalar("SELECT status FROM requests WHERE id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "Printed");
    }

    #[tokio::test]
    async fn mark_printed_twice_is_noop() {
        let pool = test_pool().await;

        add_request(&pool, "Dragon", "http://x/1", None, None)
            .await
            .unwrap();
        let id = list_pending(&pool).await.unwrap()[0].id;

        mark_printed(&pool, id).await.unwrap();
        mark_printed(&pool, id).await.unwrap();
        assert!(list_pending(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_printed_on_absent_id_is_noop() {
        let pool = test_pool().await;
        mark_printed(&pool, 9999).await.unwrap();
    }

    #[tokio::test]
    async fn printed_rows_never_listed() {
        let pool = test_pool().await;

        add_request(&pool, "A", "http://x/a", None, None).await.unwrap();
        add_request(&pool, "B", "http://x/b", None, None).await.unwrap();
        let id = list_pending(&pool).await.unwrap()[0].id;
        mark_printed(&pool, id).await.unwrap();

        let pending = list_pending(&pool).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert!(pending.iter().all(|r| r.status == "Pending"));
    }
}
