use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::database::ports::books::{BooksRepository, MatchField};
use crate::domain::{Book, BookId, NewBook};
use crate::error::{LibraryError, Result};

/// PostgreSQL-backed implementation of the `BooksRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresBooksRepository {
    pool: PgPool,
}

impl PostgresBooksRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BooksRepository for PostgresBooksRepository {
    async fn count_books(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    async fn list_authors(&self) -> Result<Vec<String>> {
        let authors = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT author FROM books ORDER BY author",
        )
        .fetch_all(self.pool())
        .await?;

        debug!(count = authors.len(), "listed distinct authors");
        Ok(authors)
    }

    async fn get_book(&self, id: BookId) -> Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT
                b.id, b.title, b.author, b.description, b.read,
                b.added_on, b.goodreads_link, b.image
            FROM books b
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(book)
    }

    async fn find_by_substring(&self, field: MatchField, text: &str) -> Result<Vec<Book>> {
        let sql = match field {
            MatchField::Title => {
                r#"
                SELECT
                    b.id, b.title, b.author, b.description, b.read,
                    b.added_on, b.goodreads_link, b.image
                FROM books b
                WHERE b.title ILIKE $1
                ORDER BY b.id
                "#
            }
            MatchField::Author => {
                r#"
                SELECT
                    b.id, b.title, b.author, b.description, b.read,
                    b.added_on, b.goodreads_link, b.image
                FROM books b
                WHERE b.author ILIKE $1
                ORDER BY b.id
                "#
            }
        };

        let books = sqlx::query_as::<_, Book>(sql)
            .bind(format!("%{text}%"))
            .fetch_all(self.pool())
            .await?;

        debug!(?field, text, matches = books.len(), "substring search");
        Ok(books)
    }

    async fn insert_books(&self, books: &[NewBook]) -> Result<usize> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            LibraryError::Internal(format!("Failed to start transaction: {}", e))
        })?;

        for book in books {
            sqlx::query(
                r#"
                INSERT INTO books (
                    title, author, description, read,
                    added_on, goodreads_link, image
                )
                VALUES ($1, $2, $3, $4, COALESCE($5, NOW()), $6, $7)
                "#,
            )
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.description)
            .bind(book.read)
            .bind(book.added_on)
            .bind(&book.goodreads_link)
            .bind(&book.image)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await.map_err(|e| {
            LibraryError::Internal(format!("Failed to commit transaction: {}", e))
        })?;

        info!("Inserted {} books", books.len());
        Ok(books.len())
    }
}
