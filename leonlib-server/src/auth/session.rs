use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use tracing::debug;

/// Session key holding the login `state` nonce.
pub const OAUTH_STATE_KEY: &str = "oauth_state";

/// Session key holding the authenticated user's provider subject.
pub const USER_ID_KEY: &str = "user_id";

/// Reads the authenticated user id from the session.
///
/// A session that cannot be loaded, a missing key, and a value of the wrong
/// type all mean "not authenticated".
pub async fn current_user_id(session: &Session) -> Option<String> {
    match session.get::<String>(USER_ID_KEY).await {
        Ok(user_id) => user_id.filter(|id| !id.is_empty()),
        Err(err) => {
            debug!(error = %err, "session user id unavailable");
            None
        }
    }
}

/// Authentication state of the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: Option<String>,
}

impl CurrentUser {
    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_id = match Session::from_request_parts(parts, state).await {
            Ok(session) => current_user_id(&session).await,
            Err(_) => None,
        };
        Ok(Self { user_id })
    }
}
