//! Path table of every route the server answers.

pub mod pages {
    pub const INDEX: &str = "/";
    pub const SEARCH_BOOKS: &str = "/search_books";
    pub const BOOKS_BY_AUTHOR: &str = "/books_by_author";
    pub const BOOK_INFO: &str = "/book_info";
    pub const ERROR: &str = "/error";
}

pub mod api {
    pub const BOOKS: &str = "/api/books";
    pub const BOOKS_COUNT: &str = "/api/booksCount";
    pub const LIKES_COUNT: &str = "/api/likes_count";
    pub const LIKE: &str = "/api/like";
    pub const UNLIKE: &str = "/api/unlike";
    pub const LIKE_STATUS: &str = "/api/like_status/{book_id}";
    /// Older name of [`LIKE_STATUS`], kept for existing clients.
    pub const CHECK_LIKE: &str = "/api/check_like/{book_id}";

    pub fn like_status(book_id: impl std::fmt::Display) -> String {
        format!("/api/like_status/{book_id}")
    }
}

pub mod auth {
    pub const LOGIN: &str = "/auth/google/login";
    pub const LOGIN_ALIAS: &str = "/ingresar";
    pub const CALLBACK: &str = "/auth/callback";
}

pub mod admin {
    pub const INIT_DB: &str = "/adm/initdb";
}

pub const ASSETS: &str = "/assets";
