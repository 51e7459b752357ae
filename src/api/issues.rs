//! Issue tracking endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{issue::IssueDetails, user::Tier},
};

use super::AuthenticatedUser;

/// Return confirmation
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub status: String,
}

/// List the caller's active issues, most recent first
#[utoipa::path(
    get,
    path = "/my-books",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active issues of the caller", body = Vec<IssueDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<IssueDetails>>> {
    let caller = state.services.access.require(&claims, Tier::Authenticated).await?;

    let issues = state.services.borrowing.my_books(&caller).await?;
    Ok(Json(issues))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/issues/{id}/return",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "No active issue with this id belongs to the caller")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(issue_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let caller = state.services.access.require(&claims, Tier::Authenticated).await?;

    state.services.borrowing.return_book(&caller, issue_id).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
    }))
}

/// Full issue history, most recent first
#[utoipa::path(
    get,
    path = "/issues",
    tag = "issues",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All issues, active and returned", body = Vec<IssueDetails>),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn list_issues(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<IssueDetails>>> {
    state.services.access.require(&claims, Tier::Librarian).await?;

    let issues = state.services.borrowing.issue_history().await?;
    Ok(Json(issues))
}

/// Active issues of a book (who has it out)
#[utoipa::path(
    get,
    path = "/books/{id}/issues",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Active issues of the book", body = Vec<IssueDetails>),
        (status = 403, description = "Librarian privileges required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_issues(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<IssueDetails>>> {
    state.services.access.require(&claims, Tier::Librarian).await?;

    let issues = state.services.borrowing.book_issues(book_id).await?;
    Ok(Json(issues))
}
