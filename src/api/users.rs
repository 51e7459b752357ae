//! Administration endpoints for user accounts

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::user::{Tier, User},
};

use super::AuthenticatedUser;

/// List all users, newest first
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    state.services.access.require(&claims, Tier::Admin).await?;

    let users = state.services.users.list().await?;
    Ok(Json(users))
}

/// Promote a member to librarian
#[utoipa::path(
    post,
    path = "/admin/users/{id}/promote",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User promoted", body = User),
        (status = 400, description = "User cannot be promoted"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn promote_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    state.services.access.require(&claims, Tier::Admin).await?;

    let user = state.services.users.promote(id).await?;
    Ok(Json(user))
}
