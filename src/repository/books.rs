//! Books repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new book; available copies start equal to total copies.
    pub async fn insert(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Whether a book row exists (transaction-scoped)
    pub async fn exists(&self, conn: &mut PgConnection, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(exists)
    }

    /// Full catalog, ordered by title
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Case-insensitive contains search over title, author and ISBN
    pub async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let like = format!("%{}%", query);
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE title ILIKE $1 OR author ILIKE $1 OR isbn ILIKE $1
            ORDER BY title
            "#,
        )
        .bind(&like)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Delete a book together with its issue history.
    ///
    /// Deleting an absent id is a successful no-op.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        // issue rows reference the book; remove them first
        sqlx::query("DELETE FROM issues WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Conditionally take one copy off the shelf (transaction-scoped).
    ///
    /// Returns whether the decrement applied; `false` means no copy was
    /// available at execution time. The condition and the write are one
    /// atomic statement, which is what makes this usable as an admission
    /// gate under concurrency.
    pub async fn try_decrement_available(
        &self,
        conn: &mut PgConnection,
        id: i32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1 \
             WHERE id = $1 AND available_copies > 0",
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Put one copy back on the shelf (transaction-scoped).
    pub async fn increment_available(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        sqlx::query("UPDATE books SET available_copies = available_copies + 1 WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
