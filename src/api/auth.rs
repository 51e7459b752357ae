//! Authentication and account endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{ChangePassword, Login, Signup, Tier, User},
};

use super::AuthenticatedUser;

/// Successful authentication response
#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    /// Bearer token to present on subsequent requests
    pub token: String,
    pub token_type: String,
    pub user: User,
}

impl TokenResponse {
    fn new(token: String, user: User) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            user,
        }
    }
}

/// Create a member account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = Signup,
    responses(
        (status = 201, description = "Account created and logged in", body = TokenResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    Json(form): Json<Signup>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let (token, user) = state.services.users.signup(form).await?;
    Ok((StatusCode::CREATED, Json(TokenResponse::new(token, user))))
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = Login,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(form): Json<Login>,
) -> AppResult<Json<TokenResponse>> {
    let (token, user) = state.services.users.login(form).await?;
    Ok(Json(TokenResponse::new(token, user)))
}

/// End the caller's session.
///
/// Tokens are stateless: the endpoint confirms the caller was
/// authenticated and the client discards the token.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<StatusCode> {
    state.services.access.require(&claims, Tier::Authenticated).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller profile", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let caller = state.services.access.require(&claims, Tier::Authenticated).await?;

    let user = state.services.users.me(&caller).await?;
    Ok(Json(user))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/auth/password",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = ChangePassword,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Current password incorrect")
    )
)]
pub async fn change_password(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(form): Json<ChangePassword>,
) -> AppResult<StatusCode> {
    let caller = state.services.access.require(&claims, Tier::Authenticated).await?;

    state.services.users.change_password(&caller, form).await?;
    Ok(StatusCode::NO_CONTENT)
}
