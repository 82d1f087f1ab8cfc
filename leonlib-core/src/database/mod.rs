//! Repository ports and their implementations.

pub mod ports;
pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use ports::{
    books::{BooksRepository, MatchField},
    likes::LikesRepository,
    users::UsersRepository,
};
pub use postgres::{
    PostgresBooksRepository, PostgresLikesRepository, PostgresUsersRepository,
};
