use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{LibraryError, Result};

pub type BookId = i32;

/// Prefix used when a cover is inlined into HTML or JSON.
pub const IMAGE_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// A catalog entry as stored in `books`.
///
/// Books are only ever created by the catalog bulk loader; no exposed
/// operation updates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub read: bool,
    pub added_on: DateTime<Utc>,
    pub goodreads_link: Option<String>,
    pub image: Option<Vec<u8>>,
}

impl Book {
    /// Standard base64 of the cover, or an empty string when there is none.
    pub fn base64_image(&self) -> String {
        match self.image.as_deref() {
            Some(bytes) if !bytes.is_empty() => STANDARD.encode(bytes),
            _ => String::new(),
        }
    }

    /// `data:` URI for the cover, or an empty string when there is none.
    pub fn image_data_uri(&self) -> String {
        let encoded = self.base64_image();
        if encoded.is_empty() {
            encoded
        } else {
            format!("{IMAGE_DATA_URI_PREFIX}{encoded}")
        }
    }

    pub fn added_on_date(&self) -> String {
        self.added_on.format("%Y-%m-%d").to_string()
    }
}

/// JSON shape returned by `GET /api/books`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub image: String,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            description: book.description.clone().unwrap_or_default(),
            image: book.image_data_uri(),
        }
    }
}

/// A book about to be inserted; `id` and (by default) `added_on` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub read: bool,
    pub added_on: Option<DateTime<Utc>>,
    pub goodreads_link: Option<String>,
    pub image: Option<Vec<u8>>,
}

impl NewBook {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(LibraryError::InvalidInput(
                "book title must not be empty".to_string(),
            ));
        }
        if self.author.trim().is_empty() {
            return Err(LibraryError::InvalidInput(format!(
                "author of \"{}\" must not be empty",
                self.title
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(image: Option<Vec<u8>>) -> Book {
        Book {
            id: 7,
            title: "Dune".into(),
            author: "Herbert".into(),
            description: None,
            read: true,
            added_on: DateTime::parse_from_rfc3339("2023-11-05T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            goodreads_link: None,
            image,
        }
    }

    #[test]
    fn image_data_uri_is_empty_without_cover() {
        assert_eq!(book(None).image_data_uri(), "");
        assert_eq!(book(Some(Vec::new())).image_data_uri(), "");
    }

    #[test]
    fn image_data_uri_inlines_jpeg() {
        let uri = book(Some(vec![0xff, 0xd8, 0xff])).image_data_uri();
        assert_eq!(uri, "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn summary_defaults_missing_description() {
        let summary = BookSummary::from(&book(None));
        assert_eq!(summary.description, "");
        assert_eq!(summary.id, 7);
    }

    #[test]
    fn added_on_formats_as_date() {
        assert_eq!(book(None).added_on_date(), "2023-11-05");
    }

    #[test]
    fn validate_rejects_blank_author() {
        let new_book = NewBook {
            title: "Dune".into(),
            author: "  ".into(),
            description: None,
            read: false,
            added_on: None,
            goodreads_link: None,
            image: None,
        };
        assert!(matches!(
            new_book.validate(),
            Err(LibraryError::InvalidInput(_))
        ));
    }
}
