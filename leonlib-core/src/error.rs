use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LibraryError {
    /// Maps a write failure, turning foreign-key violations into `NotFound`
    /// so callers can tell a dangling reference apart from a broken store.
    /// `describe` names the missing entity from the violated constraint.
    pub fn from_write(err: sqlx::Error, describe: impl FnOnce(Option<&str>) -> String) -> Self {
        if let Some(db_err) = err.as_database_error()
            && db_err.is_foreign_key_violation()
        {
            return LibraryError::NotFound(describe(db_err.constraint()));
        }
        LibraryError::Database(err)
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
