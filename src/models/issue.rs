//! Issue (borrow event) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Lifecycle of a borrow event.
///
/// An issue is either still out or was returned exactly once; there is no
/// third state, and a returned issue cannot become active again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum IssueStatus {
    Active,
    Returned { at: DateTime<Utc> },
}

impl IssueStatus {
    pub fn from_returned_at(returned_at: Option<DateTime<Utc>>) -> Self {
        match returned_at {
            None => IssueStatus::Active,
            Some(at) => IssueStatus::Returned { at },
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, IssueStatus::Active)
    }
}

/// Issue row as stored, with the joined display columns
#[derive(Debug, Clone, FromRow)]
pub struct IssueRow {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub issued_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub book_title: String,
    pub user_name: String,
}

/// Issue with display fields for listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssueDetails {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub book_title: String,
    pub user_name: String,
    pub issued_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub status: IssueStatus,
    pub is_overdue: bool,
}

impl IssueDetails {
    /// Build display details from a row, computing overdue against `now`.
    pub fn from_row(row: IssueRow, now: DateTime<Utc>) -> Self {
        let status = IssueStatus::from_returned_at(row.returned_at);
        let is_overdue = status.is_active() && row.due_date < now;
        Self {
            id: row.id,
            book_id: row.book_id,
            user_id: row.user_id,
            book_title: row.book_title,
            user_name: row.user_name,
            issued_at: row.issued_at,
            due_date: row.due_date,
            status,
            is_overdue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(due_in_days: i64, returned_at: Option<DateTime<Utc>>) -> IssueRow {
        let now = Utc::now();
        IssueRow {
            id: 1,
            book_id: 2,
            user_id: 3,
            issued_at: now - Duration::days(1),
            due_date: now + Duration::days(due_in_days),
            returned_at,
            book_title: "Invisible Cities".to_string(),
            user_name: "Marco".to_string(),
        }
    }

    #[test]
    fn status_reflects_return_timestamp() {
        assert_eq!(IssueStatus::from_returned_at(None), IssueStatus::Active);

        let at = Utc::now();
        let status = IssueStatus::from_returned_at(Some(at));
        assert_eq!(status, IssueStatus::Returned { at });
        assert!(!status.is_active());
    }

    #[test]
    fn active_issue_past_due_is_overdue() {
        let details = IssueDetails::from_row(row(-2, None), Utc::now());
        assert!(details.is_overdue);

        let details = IssueDetails::from_row(row(5, None), Utc::now());
        assert!(!details.is_overdue);
    }

    #[test]
    fn returned_issue_is_never_overdue() {
        // Due date long past, but the book came back.
        let details = IssueDetails::from_row(row(-30, Some(Utc::now())), Utc::now());
        assert!(!details.is_overdue);
        assert!(!details.status.is_active());
    }
}
