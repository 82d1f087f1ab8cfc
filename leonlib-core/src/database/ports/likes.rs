use async_trait::async_trait;

use crate::domain::BookId;
use crate::error::Result;

/// At most one like exists per `(book_id, user_id)`; the store enforces it.
#[async_trait]
pub trait LikesRepository: Send + Sync {
    /// Idempotent: liking an already liked book is a no-op.
    async fn like(&self, book_id: BookId, user_id: &str) -> Result<()>;
    /// Removing a like that does not exist is not an error.
    async fn unlike(&self, book_id: BookId, user_id: &str) -> Result<()>;
    async fn is_liked(&self, book_id: BookId, user_id: &str) -> Result<bool>;
    async fn count_likes(&self, book_id: BookId) -> Result<i64>;
}
