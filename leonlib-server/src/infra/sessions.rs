use tower_sessions::{
    Expiry, SessionManagerLayer, SessionStore,
    cookie::{Key, SameSite},
    service::SignedCookie,
};

use crate::infra::config::{ConfigError, SessionConfig};

/// Session layer with a signed `user-session` cookie that expires after a
/// period of inactivity.
pub fn session_layer<Store>(
    config: &SessionConfig,
    store: Store,
) -> Result<SessionManagerLayer<Store, SignedCookie>, ConfigError>
where
    Store: SessionStore + Clone,
{
    let key = Key::from(&config.signing_key()?);
    let inactivity =
        time::Duration::try_from(config.inactivity).map_err(|_| ConfigError::Invalid {
            key: "session inactivity",
            value: format!("{:?}", config.inactivity),
        })?;

    Ok(SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_secure(config.secure_cookies)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(inactivity))
        .with_signed(key))
}
