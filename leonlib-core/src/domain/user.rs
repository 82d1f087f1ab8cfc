use serde::{Deserialize, Serialize};

/// Identity returned by the provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider-issued subject identifier; primary key of `users`.
    pub subject: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub oauth_identifier: String,
}
