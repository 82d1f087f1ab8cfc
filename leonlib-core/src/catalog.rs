//! Bulk loading of the book catalog from a TOML description plus a directory
//! of cover images.
//!
//! The whole catalog is read and validated before anything is written, and
//! the rows are inserted through [`BooksRepository::insert_books`], which is
//! all-or-nothing. A missing image or a malformed entry therefore leaves the
//! catalog untouched.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::database::ports::books::BooksRepository;
use crate::domain::NewBook;
use crate::error::{LibraryError, Result};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "Book", alias = "book", alias = "books", default)]
    books: Vec<CatalogEntry>,
}

/// One `[[Book]]` table of the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogEntry {
    #[serde(alias = "title")]
    pub title: String,
    #[serde(alias = "author")]
    pub author: String,
    #[serde(default, alias = "description")]
    pub description: Option<String>,
    #[serde(default, alias = "has_been_read", alias = "read")]
    pub has_been_read: bool,
    #[serde(default, alias = "image_name")]
    pub image_name: Option<String>,
    #[serde(default, alias = "added_on")]
    pub added_on: Option<String>,
    #[serde(default, alias = "goodreads_link")]
    pub goodreads_link: Option<String>,
}

impl CatalogEntry {
    fn added_on(&self) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.added_on.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()));
        }

        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| {
                LibraryError::Catalog(format!(
                    "invalid AddedOn \"{raw}\" for \"{}\": {e}",
                    self.title
                ))
            })
    }
}

/// Outcome of a successful bulk load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogReport {
    pub inserted: usize,
}

#[derive(Debug, Clone)]
pub struct CatalogLoader {
    catalog_path: PathBuf,
    images_dir: PathBuf,
}

impl CatalogLoader {
    pub fn new(catalog_path: impl Into<PathBuf>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            images_dir: images_dir.into(),
        }
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    pub async fn read_entries(&self) -> Result<Vec<CatalogEntry>> {
        let contents = tokio::fs::read_to_string(&self.catalog_path)
            .await
            .map_err(|e| {
                LibraryError::Catalog(format!(
                    "failed to read catalog {}: {e}",
                    self.catalog_path.display()
                ))
            })?;

        let file: CatalogFile = toml::from_str(&contents)?;
        Ok(file.books)
    }

    /// Reads every entry and its cover image, producing rows ready to insert.
    pub async fn prepare(&self) -> Result<Vec<NewBook>> {
        let entries = self.read_entries().await?;
        let mut books = Vec::with_capacity(entries.len());

        for entry in entries {
            info!(title = %entry.title, author = %entry.author, "reading catalog entry");

            let image = match entry.image_name.as_deref().filter(|name| !name.is_empty()) {
                Some(name) => {
                    let path = self.images_dir.join(name);
                    let bytes = tokio::fs::read(&path).await.map_err(|e| {
                        LibraryError::Catalog(format!(
                            "failed to read image {} for \"{}\": {e}",
                            path.display(),
                            entry.title
                        ))
                    })?;
                    Some(bytes)
                }
                None => None,
            };

            let book = NewBook {
                added_on: entry.added_on()?,
                title: entry.title,
                author: entry.author,
                description: entry.description,
                read: entry.has_been_read,
                goodreads_link: entry.goodreads_link,
                image,
            };
            book.validate()?;
            books.push(book);
        }

        debug!(count = books.len(), "catalog prepared");
        Ok(books)
    }

    pub async fn load_into(&self, books: &dyn BooksRepository) -> Result<CatalogReport> {
        let prepared = self.prepare().await?;
        let inserted = books.insert_books(&prepared).await?;

        info!(
            inserted,
            catalog = %self.catalog_path.display(),
            "catalog loaded"
        );
        Ok(CatalogReport { inserted })
    }
}
