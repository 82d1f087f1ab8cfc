pub mod books;
pub mod likes;
pub mod users;
