//! Page view models and the renderer that turns them into HTML.

use std::path::Path;

use chrono::Utc;
use minijinja::{Environment, path_loader};
use serde::Serialize;

use leonlib_core::{Book, BookId};

/// Variables every page receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContext {
    pub year: String,
    pub site_key: String,
    pub logged_in: bool,
}

impl PageContext {
    pub fn new(site_key: impl Into<String>, logged_in: bool) -> Self {
        Self {
            year: Utc::now().format("%Y").to_string(),
            site_key: site_key.into(),
            logged_in,
        }
    }
}

/// A book as shown on the results and detail pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookView {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub has_been_read: bool,
    pub base64_image: String,
    pub added_on: String,
    pub goodreads_link: String,
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            description: book.description.clone().unwrap_or_default(),
            has_been_read: book.read,
            base64_image: book.base64_image(),
            added_on: book.added_on_date(),
            goodreads_link: book.goodreads_link.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Index {
        #[serde(flatten)]
        context: PageContext,
    },
    BooksByAuthor {
        #[serde(flatten)]
        context: PageContext,
        authors: Vec<String>,
    },
    SearchBooks {
        #[serde(flatten)]
        context: PageContext,
        results: Vec<BookView>,
    },
    BookInfo {
        #[serde(flatten)]
        context: PageContext,
        results: Vec<BookView>,
    },
    Error {
        #[serde(flatten)]
        context: PageContext,
    },
}

impl Page {
    pub fn template_name(&self) -> &'static str {
        match self {
            Page::Index { .. } => "index.html",
            Page::BooksByAuthor { .. } => "books_by_author.html",
            Page::SearchBooks { .. } => "search_books.html",
            Page::BookInfo { .. } => "book_info.html",
            Page::Error { .. } => "error5xx.html",
        }
    }
}

pub trait PageRenderer: Send + Sync {
    fn render(&self, page: &Page) -> anyhow::Result<String>;
}

/// Renders pages with minijinja templates loaded from a directory.
#[derive(Debug)]
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    pub fn new(template_dir: impl AsRef<Path>) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(template_dir.as_ref()));
        Self { env }
    }
}

impl PageRenderer for TemplateRenderer {
    fn render(&self, page: &Page) -> anyhow::Result<String> {
        let template = self.env.get_template(page.template_name())?;
        Ok(template.render(page)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn context(logged_in: bool) -> PageContext {
        PageContext {
            year: "2024".into(),
            site_key: "site-key".into(),
            logged_in,
        }
    }

    #[test]
    fn page_serializes_flat_with_its_name() {
        let page = Page::BooksByAuthor {
            context: context(true),
            authors: vec!["Asimov".into()],
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["page"], "books_by_author");
        assert_eq!(value["logged_in"], true);
        assert_eq!(value["site_key"], "site-key");
        assert_eq!(value["authors"][0], "Asimov");
    }

    #[test]
    fn book_view_formats_date_and_image() {
        let book = Book {
            id: 3,
            title: "Dune".into(),
            author: "Herbert".into(),
            description: None,
            read: false,
            added_on: DateTime::parse_from_rfc3339("2022-02-01T18:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            goodreads_link: None,
            image: Some(b"abc".to_vec()),
        };
        let view = BookView::from(&book);
        assert_eq!(view.added_on, "2022-02-01");
        assert_eq!(view.base64_image, "YWJj");
        assert_eq!(view.description, "");
    }

    #[test]
    fn template_renderer_escapes_and_fills_context() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("books_by_author.html"),
            "{{ year }}|{% for a in authors %}{{ a }};{% endfor %}|{% if logged_in %}in{% else %}out{% endif %}",
        )
        .unwrap();

        let renderer = TemplateRenderer::new(dir.path());
        let html = renderer
            .render(&Page::BooksByAuthor {
                context: context(false),
                authors: vec!["Tolkien & Co".into()],
            })
            .unwrap();
        assert_eq!(html, "2024|Tolkien &amp; Co;|out");
    }

    #[test]
    fn missing_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = TemplateRenderer::new(dir.path());
        assert!(renderer.render(&Page::Index { context: context(false) }).is_err());
    }
}
