//! Domain records shared by the repositories, the search dispatcher and the
//! HTTP layer.

pub mod book;
pub mod user;

pub use book::{Book, BookId, BookSummary, NewBook};
pub use user::{User, UserProfile};
