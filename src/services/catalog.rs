//! Catalog management service (the inventory ledger)

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List or search the catalog, ordered by title.
    pub async fn browse(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        match query.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => self.repository.books.search(q).await,
            _ => self.repository.books.list().await,
        }
    }

    /// Get a single book
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Add a book to the catalog
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;
        let created = self.repository.books.insert(&book).await?;
        tracing::info!(book_id = created.id, title = %created.title, "book added to catalog");
        Ok(created)
    }

    /// Remove a book and its borrow history.
    ///
    /// Removing an unknown id is a no-op reported as success.
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "book removed from catalog");
        Ok(())
    }
}
