//! # Leonlib Core
//!
//! Domain types and persistence for the Leonlib book library: the catalog of
//! books, the users who sign in through an identity provider, and the likes
//! that connect them.
//!
//! ## Overview
//!
//! - **Catalog**: [`domain::Book`] rows, bulk loaded from a TOML description
//!   by [`catalog::CatalogLoader`]
//! - **Search**: case-insensitive substring search by title and/or author,
//!   dispatched by [`search::dispatch_search`]
//! - **Likes**: idempotent per-user likes with public counts
//! - **Database Abstraction**: repository ports in [`database::ports`] with
//!   PostgreSQL implementations
//!
//! ## Feature Flags
//!
//! - `test-utils`: exposes `database::memory::InMemoryLibrary`, an in-memory
//!   implementation of every repository port

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Catalog bulk loading from TOML plus a directory of cover images
pub mod catalog;

/// Repository ports and implementations
pub mod database;

/// Books, users and the shapes they are served in
pub mod domain;

/// Error types
pub mod error;

/// Search-type parsing and dispatch
pub mod search;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use catalog::{CatalogEntry, CatalogLoader, CatalogReport};
pub use domain::{Book, BookId, BookSummary, NewBook, User, UserProfile};
pub use error::{LibraryError, Result};
pub use search::{BookSearchType, SearchOutcome, dispatch_search};
