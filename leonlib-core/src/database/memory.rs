//! In-memory implementation of every repository port.
//!
//! Mirrors the PostgreSQL behaviour the rest of the crate relies on: ids are
//! assigned in insertion order, substring search is case-insensitive, likes
//! reference existing books and users, and the bulk insert is all-or-nothing.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::ports::{
    books::{BooksRepository, MatchField},
    likes::LikesRepository,
    users::UsersRepository,
};
use crate::domain::{Book, BookId, NewBook, User, UserProfile};
use crate::error::{LibraryError, Result};

#[derive(Debug, Default)]
struct Tables {
    books: Vec<Book>,
    users: Vec<User>,
    likes: Vec<(BookId, String)>,
}

#[derive(Debug, Default)]
pub struct InMemoryLibrary {
    tables: RwLock<Tables>,
    failing: AtomicBool,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every operation fails as if the store were unreachable.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn like_rows(&self) -> usize {
        self.tables.read().await.likes.len()
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LibraryError::Internal("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BooksRepository for InMemoryLibrary {
    async fn count_books(&self) -> Result<i64> {
        self.check_available()?;
        Ok(self.tables.read().await.books.len() as i64)
    }

    async fn list_authors(&self) -> Result<Vec<String>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut authors: Vec<String> = tables.books.iter().map(|b| b.author.clone()).collect();
        authors.sort();
        authors.dedup();
        Ok(authors)
    }

    async fn get_book(&self, id: BookId) -> Result<Option<Book>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.books.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_substring(&self, field: MatchField, text: &str) -> Result<Vec<Book>> {
        self.check_available()?;
        let needle = text.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .iter()
            .filter(|book| {
                let haystack = match field {
                    MatchField::Title => &book.title,
                    MatchField::Author => &book.author,
                };
                haystack.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn insert_books(&self, books: &[NewBook]) -> Result<usize> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let mut next_id = tables.books.iter().map(|b| b.id).max().unwrap_or(0);
        let now = Utc::now();

        let rows: Vec<Book> = books
            .iter()
            .map(|book| {
                next_id += 1;
                Book {
                    id: next_id,
                    title: book.title.clone(),
                    author: book.author.clone(),
                    description: book.description.clone(),
                    read: book.read,
                    added_on: book.added_on.unwrap_or(now),
                    goodreads_link: book.goodreads_link.clone(),
                    image: book.image.clone(),
                }
            })
            .collect();

        tables.books.extend(rows);
        Ok(books.len())
    }
}

#[async_trait]
impl UsersRepository for InMemoryLibrary {
    async fn upsert_user(&self, profile: &UserProfile, oauth_identifier: &str) -> Result<()> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        match tables.users.iter_mut().find(|u| u.user_id == profile.subject) {
            Some(existing) => {
                existing.email = profile.email.clone();
                existing.name = profile.name.clone();
            }
            None => tables.users.push(User {
                user_id: profile.subject.clone(),
                email: profile.email.clone(),
                name: profile.name.clone(),
                oauth_identifier: oauth_identifier.to_string(),
            }),
        }
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.user_id == user_id).cloned())
    }
}

#[async_trait]
impl LikesRepository for InMemoryLibrary {
    async fn like(&self, book_id: BookId, user_id: &str) -> Result<()> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if !tables.books.iter().any(|b| b.id == book_id) {
            return Err(LibraryError::NotFound(format!("book {book_id}")));
        }
        if !tables.users.iter().any(|u| u.user_id == user_id) {
            return Err(LibraryError::NotFound(format!("user {user_id}")));
        }
        let exists = tables
            .likes
            .iter()
            .any(|(b, u)| *b == book_id && u == user_id);
        if !exists {
            tables.likes.push((book_id, user_id.to_string()));
        }
        Ok(())
    }

    async fn unlike(&self, book_id: BookId, user_id: &str) -> Result<()> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        tables
            .likes
            .retain(|(b, u)| !(*b == book_id && u == user_id));
        Ok(())
    }

    async fn is_liked(&self, book_id: BookId, user_id: &str) -> Result<bool> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .any(|(b, u)| *b == book_id && u == user_id))
    }

    async fn count_likes(&self, book_id: BookId) -> Result<i64> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.likes.iter().filter(|(b, _)| *b == book_id).count() as i64)
    }
}
