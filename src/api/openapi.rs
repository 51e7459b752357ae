//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, issues, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblion API",
        version = "1.0.0",
        description = "Book Lending System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::logout,
        auth::me,
        auth::change_password,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::delete_book,
        books::issue_book,
        // Issues
        issues::my_books,
        issues::return_book,
        issues::list_issues,
        issues::book_issues,
        // Admin
        users::list_users,
        users::promote_user,
    ),
    components(
        schemas(
            // Auth
            auth::TokenResponse,
            crate::models::user::Signup,
            crate::models::user::Login,
            crate::models::user::ChangePassword,
            crate::models::user::User,
            crate::models::user::Role,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            books::IssueResponse,
            // Issues
            crate::models::issue::IssueDetails,
            crate::models::issue::IssueStatus,
            issues::ReturnResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and account endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "borrowing", description = "Borrowing and returning"),
        (name = "issues", description = "Issue history"),
        (name = "admin", description = "User administration")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
