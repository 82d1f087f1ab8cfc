//! Server-rendered pages. Data failures redirect to the error page.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, error, warn};

use super::{QueryParams, parse_book_id, redirect_to_error};
use crate::auth::CurrentUser;
use crate::infra::{app_state::AppState, errors::AppResult};
use crate::views::{BookView, Page};
use leonlib_core::{SearchOutcome, dispatch_search};

pub async fn index(State(state): State<AppState>, user: CurrentUser) -> AppResult<Html<String>> {
    state.render(&Page::Index {
        context: state.page_context(user.is_logged_in()),
    })
}

pub async fn books_by_author(State(state): State<AppState>, user: CurrentUser) -> Response {
    let authors = match state.books.list_authors().await {
        Ok(authors) => authors,
        Err(err) => {
            error!(error = %err, "failed to list authors");
            return redirect_to_error();
        }
    };
    debug!(count = authors.len(), "listing authors");

    state
        .render(&Page::BooksByAuthor {
            context: state.page_context(user.is_logged_in()),
            authors,
        })
        .into_response()
}

pub async fn search_books(
    State(state): State<AppState>,
    user: CurrentUser,
    params: QueryParams,
) -> Response {
    let outcome = dispatch_search(
        state.books.as_ref(),
        params.get("textSearch").unwrap_or_default(),
        params.get("searchType"),
    )
    .await;

    let books = match outcome {
        Ok(SearchOutcome::Found(books)) => books,
        Ok(SearchOutcome::UnknownSearchType(token)) => {
            warn!(token = %token, "rejecting search with unknown search type");
            return redirect_to_error();
        }
        Err(err) => {
            error!(error = %err, "book search failed");
            return redirect_to_error();
        }
    };

    state
        .render(&Page::SearchBooks {
            context: state.page_context(user.is_logged_in()),
            results: books.iter().map(BookView::from).collect(),
        })
        .into_response()
}

pub async fn book_info(
    State(state): State<AppState>,
    user: CurrentUser,
    params: QueryParams,
) -> Response {
    let raw_id = params.get("id");
    let Some(id) = raw_id.and_then(parse_book_id) else {
        debug!(id = ?raw_id, "book_info without a numeric id");
        return redirect_to_error();
    };

    let book = match state.books.get_book(id).await {
        Ok(Some(book)) => book,
        Ok(None) => {
            debug!(id, "book not found");
            return redirect_to_error();
        }
        Err(err) => {
            error!(id, error = %err, "failed to load book");
            return redirect_to_error();
        }
    };

    state
        .render(&Page::BookInfo {
            context: state.page_context(user.is_logged_in()),
            results: vec![BookView::from(&book)],
        })
        .into_response()
}

pub async fn error_page(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Html<String>> {
    state.render(&Page::Error {
        context: state.page_context(user.is_logged_in()),
    })
}
