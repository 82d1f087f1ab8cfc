//! JSON endpoints for the catalog and likes.

use axum::{
    Form, Json,
    extract::{
        Path, State,
        rejection::{FormRejection, JsonRejection},
    },
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{QueryParams, parse_book_id};
use crate::auth::CurrentUser;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};
use leonlib_core::database::MatchField;
use leonlib_core::{BookId, BookSummary};

/// Books whose author contains `start_with`, case-insensitively.
pub async fn books_list(
    State(state): State<AppState>,
    params: QueryParams,
) -> AppResult<Json<Vec<BookSummary>>> {
    let author = params.get("start_with").unwrap_or_default();
    let books = state
        .books
        .find_by_substring(MatchField::Author, author)
        .await?;

    Ok(Json(books.iter().map(BookSummary::from).collect()))
}

#[derive(Debug, Serialize)]
pub struct BooksCountResponse {
    #[serde(rename = "booksCount")]
    pub books_count: i64,
}

pub async fn books_count(State(state): State<AppState>) -> AppResult<Json<BooksCountResponse>> {
    let books_count = state.books.count_books().await?;
    Ok(Json(BooksCountResponse { books_count }))
}

#[derive(Debug, Serialize)]
pub struct LikesCountResponse {
    pub count: i64,
}

pub async fn likes_count(
    State(state): State<AppState>,
    params: QueryParams,
) -> AppResult<Json<LikesCountResponse>> {
    let raw = params
        .get("book_id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::bad_request("book_id is required"))?;
    let book_id = parse_book_id(raw).ok_or_else(|| AppError::bad_request("Invalid book_id"))?;

    let count = state.likes.count_likes(book_id).await?;
    Ok(Json(LikesCountResponse { count }))
}

fn require_user(user: CurrentUser) -> AppResult<String> {
    user.user_id
        .ok_or_else(|| AppError::unauthorized("Authentication required"))
}

#[derive(Debug, Deserialize)]
pub struct LikeForm {
    pub book_id: Option<String>,
}

pub async fn like(
    State(state): State<AppState>,
    user: CurrentUser,
    form: Result<Form<LikeForm>, FormRejection>,
) -> AppResult<&'static str> {
    let user_id = require_user(user)?;
    let Form(form) = form.map_err(|rejection| {
        debug!(error = %rejection, "malformed like form");
        AppError::bad_request("Malformed request body")
    })?;
    let book_id = form
        .book_id
        .as_deref()
        .and_then(parse_book_id)
        .ok_or_else(|| AppError::bad_request("Invalid book_id"))?;

    state.likes.like(book_id, &user_id).await?;
    debug!(book_id, user_id = %user_id, "like recorded");
    Ok("Liked successfully")
}

/// `book_id` as sent by clients: either a string or a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BookIdField {
    Text(String),
    Number(i64),
}

impl BookIdField {
    fn parse(&self) -> Option<BookId> {
        match self {
            BookIdField::Text(raw) => parse_book_id(raw),
            BookIdField::Number(n) => BookId::try_from(*n).ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UnlikeRequest {
    pub book_id: BookIdField,
}

pub async fn unlike(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<UnlikeRequest>, JsonRejection>,
) -> AppResult<&'static str> {
    let user_id = require_user(user)?;
    let Json(request) = body.map_err(|rejection| {
        debug!(error = %rejection, "malformed unlike body");
        AppError::bad_request("Malformed request body")
    })?;
    let book_id = request
        .book_id
        .parse()
        .ok_or_else(|| AppError::bad_request("Invalid book_id"))?;

    state.likes.unlike(book_id, &user_id).await?;
    debug!(book_id, user_id = %user_id, "like removed");
    Ok("Unliked successfully")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LikeStatus {
    Liked,
    NotLiked,
    Unauthenticated,
    Error,
}

#[derive(Debug, Serialize)]
pub struct LikeStatusResponse {
    pub status: LikeStatus,
}

pub async fn like_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(book_id): Path<String>,
) -> Json<LikeStatusResponse> {
    let status = match (user.user_id, parse_book_id(&book_id)) {
        (None, _) => LikeStatus::Unauthenticated,
        (Some(_), None) => {
            debug!(book_id = %book_id, "like status for a non-numeric id");
            LikeStatus::Error
        }
        (Some(user_id), Some(book_id)) => match state.likes.is_liked(book_id, &user_id).await {
            Ok(true) => LikeStatus::Liked,
            Ok(false) => LikeStatus::NotLiked,
            Err(err) => {
                error!(book_id, error = %err, "like status lookup failed");
                LikeStatus::Error
            }
        },
    };

    Json(LikeStatusResponse { status })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_status_uses_flat_literals() {
        let encode = |status| serde_json::to_value(LikeStatusResponse { status }).unwrap();
        assert_eq!(encode(LikeStatus::Liked)["status"], "liked");
        assert_eq!(encode(LikeStatus::NotLiked)["status"], "not-liked");
        assert_eq!(encode(LikeStatus::Unauthenticated)["status"], "unauthenticated");
        assert_eq!(encode(LikeStatus::Error)["status"], "error");
    }

    #[test]
    fn book_id_field_accepts_strings_and_numbers() {
        let text: UnlikeRequest = serde_json::from_str(r#"{"book_id":"7"}"#).unwrap();
        assert_eq!(text.book_id.parse(), Some(7));

        let number: UnlikeRequest = serde_json::from_str(r#"{"book_id":7}"#).unwrap();
        assert_eq!(number.book_id.parse(), Some(7));

        let bogus: UnlikeRequest = serde_json::from_str(r#"{"book_id":"seven"}"#).unwrap();
        assert_eq!(bogus.book_id.parse(), None);
    }
}
