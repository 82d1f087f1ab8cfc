use async_trait::async_trait;

use crate::domain::{Book, BookId, NewBook};
use crate::error::Result;

/// Column a free-text search is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Author,
}

// Catalog reads and the bulk insert used by the catalog loader
#[async_trait]
pub trait BooksRepository: Send + Sync {
    async fn count_books(&self) -> Result<i64>;
    async fn list_authors(&self) -> Result<Vec<String>>;
    async fn get_book(&self, id: BookId) -> Result<Option<Book>>;

    /// Case-insensitive substring match (`ILIKE '%text%'`) on `field`,
    /// in ascending id order. An empty `text` matches every book.
    async fn find_by_substring(&self, field: MatchField, text: &str) -> Result<Vec<Book>>;

    /// Inserts every book or none of them. Returns the number inserted.
    async fn insert_books(&self, books: &[NewBook]) -> Result<usize>;
}
