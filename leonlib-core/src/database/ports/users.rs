use async_trait::async_trait;

use crate::domain::{User, UserProfile};
use crate::error::Result;

#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Inserts the user keyed by `profile.subject`. On conflict only `email`
    /// and `name` are overwritten; `oauth_identifier` keeps its first value.
    async fn upsert_user(&self, profile: &UserProfile, oauth_identifier: &str) -> Result<()>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;
}
