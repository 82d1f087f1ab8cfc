pub mod admin;
pub mod api;
pub mod auth;
pub mod pages;

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::routes::paths;
use leonlib_core::BookId;

pub(crate) fn parse_book_id(raw: &str) -> Option<BookId> {
    raw.trim().parse().ok()
}

pub(crate) fn redirect_to_error() -> Response {
    Redirect::to(paths::pages::ERROR).into_response()
}

/// Query string where a repeated key resolves to its first value.
///
/// A query string that cannot be decoded is treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => Ok(Self(pairs)),
            Err(rejection) => {
                debug!(error = %rejection, "undecodable query string");
                Ok(Self::default())
            }
        }
    }
}
