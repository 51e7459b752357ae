//! Book (catalog) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database.
///
/// `0 <= available_copies <= total_copies` holds after every committed
/// operation; the schema carries the matching CHECK constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Number of copies the library owns
    pub total_copies: i32,
    /// Number of copies currently on the shelf
    pub available_copies: i32,
    pub created_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title cannot be blank"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author cannot be blank"))]
    pub author: String,
    #[validate(length(min = 1, message = "ISBN cannot be blank"))]
    pub isbn: String,
    /// Number of copies to stock
    #[validate(range(min = 1, message = "Copies must be at least 1"))]
    pub total_copies: i32,
}

/// Catalog query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Case-insensitive contains search over title, author and ISBN
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_book_rejects_blank_fields() {
        let form = CreateBook {
            title: "".to_string(),
            author: "B. Traven".to_string(),
            isbn: "978-0-8090-1500-7".to_string(),
            total_copies: 1,
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn create_book_requires_at_least_one_copy() {
        let form = CreateBook {
            title: "The Death Ship".to_string(),
            author: "B. Traven".to_string(),
            isbn: "978-0-8090-1500-7".to_string(),
            total_copies: 0,
        };
        assert!(form.validate().is_err());

        let form = CreateBook {
            total_copies: 3,
            ..form
        };
        assert!(form.validate().is_ok());
    }
}
