//! Free-text book search across the title and author dimensions.
//!
//! A search request carries a query string and a comma-separated list of
//! search-type tokens. Tokens are deduplicated in first-occurrence order and
//! dispatched one by one; results are concatenated in that order without
//! removing books matched by more than one dimension. A token that names no
//! search type abandons the whole search with
//! [`SearchOutcome::UnknownSearchType`].

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::database::ports::books::{BooksRepository, MatchField};
use crate::domain::Book;
use crate::error::Result;

/// Token used when the request names no search type at all.
pub const DEFAULT_SEARCH_TYPE: &str = "byTitle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSearchType {
    /// Default value, and the result of parsing an unrecognised token.
    #[default]
    Unknown,
    ByTitle,
    ByAuthor,
}

impl BookSearchType {
    /// Case-insensitive, whitespace-trimmed parse. Anything other than
    /// `bytitle`/`byauthor` (including the empty string) is `Unknown`.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "bytitle" => BookSearchType::ByTitle,
            "byauthor" => BookSearchType::ByAuthor,
            _ => BookSearchType::Unknown,
        }
    }

    pub fn match_field(self) -> Option<MatchField> {
        match self {
            BookSearchType::ByTitle => Some(MatchField::Title),
            BookSearchType::ByAuthor => Some(MatchField::Author),
            BookSearchType::Unknown => None,
        }
    }
}

impl fmt::Display for BookSearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSearchType::ByTitle => write!(f, "ByTitle"),
            BookSearchType::ByAuthor => write!(f, "ByAuthor"),
            BookSearchType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Splits the raw `searchType` parameter on commas and removes repeated
/// tokens, keeping the first occurrence of each. Tokens are compared as
/// given; trimming and case folding happen only when they are parsed.
///
/// An absent parameter, or one that reduces to a single empty token, yields
/// `[DEFAULT_SEARCH_TYPE]`.
pub fn search_type_tokens(raw: Option<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();

    for token in raw.unwrap_or_default().split(',') {
        if seen.insert(token) {
            tokens.push(token.to_string());
        }
    }

    if tokens.is_empty() || (tokens.len() == 1 && tokens[0].is_empty()) {
        return vec![DEFAULT_SEARCH_TYPE.to_string()];
    }

    tokens
}

/// Result of a dispatched search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Concatenated matches, one block per search type in request order.
    Found(Vec<Book>),
    /// The named token is not a search type. Partial results were discarded
    /// and no later token was processed.
    UnknownSearchType(String),
}

/// Runs `text` against every requested search type in order.
///
/// Database failures are returned as errors; an unrecognised token is a
/// regular outcome so callers can answer it as a client error.
pub async fn dispatch_search(
    books: &dyn BooksRepository,
    text: &str,
    search_types: Option<&str>,
) -> Result<SearchOutcome> {
    let tokens = search_type_tokens(search_types);
    debug!(text, ?tokens, "dispatching book search");

    let mut results = Vec::new();
    for token in tokens {
        let Some(field) = BookSearchType::parse(&token).match_field() else {
            warn!(token = %token, "unknown book search type, abandoning search");
            return Ok(SearchOutcome::UnknownSearchType(token));
        };

        let matches = books.find_by_substring(field, text).await?;
        results.extend(matches);
    }

    Ok(SearchOutcome::Found(results))
}
