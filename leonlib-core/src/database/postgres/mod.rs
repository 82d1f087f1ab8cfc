//! PostgreSQL-backed implementations of the repository ports.

mod books;
mod likes;
mod users;

pub use books::PostgresBooksRepository;
pub use likes::PostgresLikesRepository;
pub use users::PostgresUsersRepository;
