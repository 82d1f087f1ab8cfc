use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::database::ports::likes::LikesRepository;
use crate::domain::BookId;
use crate::error::{LibraryError, Result};

/// Name of the `book_likes.user_id` foreign key in the initial migration.
const USER_FOREIGN_KEY: &str = "book_likes_user_id_fkey";

/// PostgreSQL-backed implementation of the `LikesRepository` port.
///
/// Uniqueness of `(book_id, user_id)` is left to the `book_likes` unique
/// constraint; concurrent likes for the same pair resolve in the store.
#[derive(Clone, Debug)]
pub struct PostgresLikesRepository {
    pool: PgPool,
}

impl PostgresLikesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LikesRepository for PostgresLikesRepository {
    async fn like(&self, book_id: BookId, user_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO book_likes (book_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (book_id, user_id) DO NOTHING
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            LibraryError::from_write(e, |constraint| match constraint {
                Some(USER_FOREIGN_KEY) => format!("user {user_id}"),
                _ => format!("book {book_id}"),
            })
        })?;

        debug!(book_id, user_id, "book liked");
        Ok(())
    }

    async fn unlike(&self, book_id: BookId, user_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM book_likes WHERE book_id = $1 AND user_id = $2")
            .bind(book_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;

        debug!(book_id, user_id, removed = result.rows_affected(), "book unliked");
        Ok(())
    }

    async fn is_liked(&self, book_id: BookId, user_id: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM book_likes WHERE book_id = $1 AND user_id = $2)",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;

        Ok(exists)
    }

    async fn count_likes(&self, book_id: BookId) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM book_likes WHERE book_id = $1")
                .bind(book_id)
                .fetch_one(self.pool())
                .await?;

        Ok(count)
    }
}
