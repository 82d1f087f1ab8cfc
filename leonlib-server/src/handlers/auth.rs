//! Login redirect and provider callback.

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{error, info};

use crate::auth::{OAUTH_STATE_KEY, USER_ID_KEY, generate_state_token};
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};
use crate::views::Page;

/// Stores a fresh `state` nonce in the session and redirects to the
/// provider's authorization endpoint.
pub async fn login(State(state): State<AppState>, session: Session) -> AppResult<Redirect> {
    let nonce = generate_state_token();
    session.insert(OAUTH_STATE_KEY, &nonce).await?;
    session.save().await?;

    Ok(Redirect::to(&state.identity.authorize_url(&nonce)))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    /// Returned by the provider; not compared against the stored nonce.
    pub state: Option<String>,
}

/// Exchanges the code, upserts the user and marks the session
/// authenticated. The session is only written once every remote and
/// database step has succeeded.
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> AppResult<Html<String>> {
    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing authorization code"))?;

    let profile = state.identity.exchange_code(&code).await.map_err(|err| {
        error!(provider = state.identity.tag(), error = %err, "identity provider sign-in failed");
        AppError::bad_gateway("Cannot get user info from identity provider")
    })?;

    state
        .users
        .upsert_user(&profile, state.identity.tag())
        .await
        .map_err(|err| {
            error!(user_id = %profile.subject, error = %err, "failed to save user");
            AppError::internal("Failed to save user")
        })?;

    session.insert(USER_ID_KEY, &profile.subject).await?;
    session.save().await?;
    info!(user_id = %profile.subject, provider = state.identity.tag(), "user signed in");

    state.render(&Page::Index {
        context: state.page_context(true),
    })
}
