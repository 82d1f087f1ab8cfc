//! Sign-in through an external identity provider and session-backed
//! authentication state.

pub mod nonce;
pub mod provider;
pub mod session;

pub use nonce::generate_state_token;
pub use provider::{IdentityError, IdentityProvider, OAuthIdentityProvider};
pub use session::{CurrentUser, OAUTH_STATE_KEY, USER_ID_KEY, current_user_id};
