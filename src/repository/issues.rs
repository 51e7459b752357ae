//! Issues repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::issue::{IssueDetails, IssueRow},
};

#[derive(Clone)]
pub struct IssuesRepository {
    pool: Pool<Postgres>,
}

impl IssuesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Record a new borrow event (transaction-scoped).
    ///
    /// A unique violation on the active-issue index means another request
    /// for the same (book, user) pair committed inside our window; that is
    /// reported as `AlreadyIssued`, and the caller's transaction rolls
    /// back.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        book_id: i32,
        user_id: i32,
        due_date: DateTime<Utc>,
    ) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO issues (book_id, user_id, due_date)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(due_date)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.constraint() == Some("issues_active_uc") {
                    return AppError::AlreadyIssued;
                }
            }
            AppError::Database(e)
        })?;

        Ok(id)
    }

    /// Mark an issue returned if it is active and belongs to the user
    /// (transaction-scoped).
    ///
    /// Returns the book id on success, `None` when no matching active
    /// issue exists: unknown id, wrong owner, or already returned.
    pub async fn mark_returned(
        &self,
        conn: &mut PgConnection,
        issue_id: i32,
        user_id: i32,
    ) -> AppResult<Option<i32>> {
        let book_id = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE issues SET returned_at = NOW()
            WHERE id = $1 AND user_id = $2 AND returned_at IS NULL
            RETURNING book_id
            "#,
        )
        .bind(issue_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(book_id)
    }

    /// Probe for an active issue of this book by this user
    /// (transaction-scoped).
    pub async fn active_exists(
        &self,
        conn: &mut PgConnection,
        book_id: i32,
        user_id: i32,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM issues \
             WHERE book_id = $1 AND user_id = $2 AND returned_at IS NULL)",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(exists)
    }

    /// Active issues for a user, most recent first
    pub async fn active_by_user(&self, user_id: i32) -> AppResult<Vec<IssueDetails>> {
        let rows = sqlx::query_as::<_, IssueRow>(
            r#"
            SELECT i.id, i.book_id, i.user_id, i.issued_at, i.due_date, i.returned_at,
                   b.title as book_title, u.name as user_name
            FROM issues i
            JOIN books b ON b.id = i.book_id
            JOIN users u ON u.id = i.user_id
            WHERE i.user_id = $1 AND i.returned_at IS NULL
            ORDER BY i.issued_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Self::into_details(rows))
    }

    /// Active issues for a book
    pub async fn active_by_book(&self, book_id: i32) -> AppResult<Vec<IssueDetails>> {
        let rows = sqlx::query_as::<_, IssueRow>(
            r#"
            SELECT i.id, i.book_id, i.user_id, i.issued_at, i.due_date, i.returned_at,
                   b.title as book_title, u.name as user_name
            FROM issues i
            JOIN books b ON b.id = i.book_id
            JOIN users u ON u.id = i.user_id
            WHERE i.book_id = $1 AND i.returned_at IS NULL
            ORDER BY i.issued_at DESC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Self::into_details(rows))
    }

    /// Full issue history, most recent first
    pub async fn all(&self) -> AppResult<Vec<IssueDetails>> {
        let rows = sqlx::query_as::<_, IssueRow>(
            r#"
            SELECT i.id, i.book_id, i.user_id, i.issued_at, i.due_date, i.returned_at,
                   b.title as book_title, u.name as user_name
            FROM issues i
            JOIN books b ON b.id = i.book_id
            JOIN users u ON u.id = i.user_id
            ORDER BY i.issued_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(Self::into_details(rows))
    }

    fn into_details(rows: Vec<IssueRow>) -> Vec<IssueDetails> {
        let now = Utc::now();
        rows.into_iter()
            .map(|row| IssueDetails::from_row(row, now))
            .collect()
    }
}
