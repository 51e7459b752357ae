//! Borrowing orchestrator
//!
//! The only component that writes copy counts or issue status. Both
//! protocols run inside a single database transaction: admission to an
//! issue is the atomic conditional decrement, not a prior read, so two
//! concurrent requests for the last copy cannot both succeed.

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{issue::IssueDetails, user::Caller},
    repository::Repository,
};

/// Loan period granted on issue
const LOAN_PERIOD_DAYS: i64 = 14;

/// Outcome of a successful issue operation
#[derive(Debug, Clone, Copy)]
pub struct Issued {
    pub issue_id: i32,
    pub due_date: DateTime<Utc>,
}

#[derive(Clone)]
pub struct BorrowingService {
    repository: Repository,
}

impl BorrowingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Issue a book to the caller.
    ///
    /// Rejections leave no trace: an early return drops the transaction
    /// and rolls back anything already written.
    pub async fn issue_book(&self, caller: &Caller, book_id: i32) -> AppResult<Issued> {
        let mut tx = self.repository.pool.begin().await?;

        if self
            .repository
            .issues
            .active_exists(&mut tx, book_id, caller.user_id)
            .await?
        {
            return Err(AppError::AlreadyIssued);
        }

        if !self
            .repository
            .books
            .try_decrement_available(&mut tx, book_id)
            .await?
        {
            // A failed decrement means either an empty shelf or no such
            // book; tell the caller which.
            return Err(if self.repository.books.exists(&mut tx, book_id).await? {
                AppError::NoCopiesAvailable
            } else {
                AppError::NotFound(format!("Book with id {} not found", book_id))
            });
        }

        let due_date = Utc::now() + Duration::days(LOAN_PERIOD_DAYS);
        let issue_id = self
            .repository
            .issues
            .create(&mut tx, book_id, caller.user_id, due_date)
            .await?;

        tx.commit().await?;

        tracing::info!(
            user_id = caller.user_id,
            book_id,
            issue_id,
            %due_date,
            "book issued"
        );

        Ok(Issued { issue_id, due_date })
    }

    /// Return an issued book.
    ///
    /// The ownership-and-status check and the status write are one
    /// conditional UPDATE; returning twice, returning someone else's
    /// issue, and returning an unknown id all fail it identically.
    pub async fn return_book(&self, caller: &Caller, issue_id: i32) -> AppResult<()> {
        let mut tx = self.repository.pool.begin().await?;

        let book_id = self
            .repository
            .issues
            .mark_returned(&mut tx, issue_id, caller.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("No active issue with this id belongs to you".to_string())
            })?;

        self.repository
            .books
            .increment_available(&mut tx, book_id)
            .await?;

        tx.commit().await?;

        tracing::info!(user_id = caller.user_id, book_id, issue_id, "book returned");

        Ok(())
    }

    /// Active issues of the caller, most recent first
    pub async fn my_books(&self, caller: &Caller) -> AppResult<Vec<IssueDetails>> {
        self.repository.issues.active_by_user(caller.user_id).await
    }

    /// Active issues of a book (librarian view)
    pub async fn book_issues(&self, book_id: i32) -> AppResult<Vec<IssueDetails>> {
        // 404 for unknown books, empty list for books nobody has out
        self.repository.books.get_by_id(book_id).await?;
        self.repository.issues.active_by_book(book_id).await
    }

    /// Full issue history for librarian review, most recent first
    pub async fn issue_history(&self) -> AppResult<Vec<IssueDetails>> {
        self.repository.issues.all().await
    }
}
