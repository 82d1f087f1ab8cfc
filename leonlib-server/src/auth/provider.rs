//! Authorization-code sign-in against Google or Auth0.
//!
//! [`OAuthIdentityProvider`] builds the authorization redirect, exchanges the
//! returned code for an access token and fetches the OIDC userinfo document.
//! Both outbound calls share one `reqwest` client whose timeout bounds every
//! request; a dropped inbound request drops the in-flight future with it.

use std::time::Duration;

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::infra::config::ProviderEndpoints;
use leonlib_core::UserProfile;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid identity provider configuration: {0}")]
    Config(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("userinfo request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("userinfo endpoint returned {status}: {body}")]
    UserInfoStatus { status: u16, body: String },

    #[error("userinfo response is missing {0}")]
    IncompleteProfile(&'static str),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Value stored as `users.oauth_identifier`.
    fn tag(&self) -> &str;

    /// Authorization endpoint URL carrying `state`.
    fn authorize_url(&self, state: &str) -> String;

    async fn exchange_code(&self, code: &str) -> Result<UserProfile, IdentityError>;
}

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    nickname: Option<String>,
}

impl UserInfo {
    fn into_profile(self) -> Result<UserProfile, IdentityError> {
        let email = self
            .email
            .filter(|e| !e.is_empty())
            .ok_or(IdentityError::IncompleteProfile("email"))?;
        let name = self
            .name
            .or(self.nickname)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email.clone());

        Ok(UserProfile {
            subject: self.sub,
            email,
            name,
        })
    }
}

#[derive(Debug)]
pub struct OAuthIdentityProvider {
    tag: &'static str,
    client: ConfiguredClient,
    http: reqwest::Client,
    userinfo_url: String,
    scopes: Vec<String>,
}

impl OAuthIdentityProvider {
    pub fn new(endpoints: ProviderEndpoints, timeout: Duration) -> Result<Self, IdentityError> {
        let invalid = |what: &str, err: oauth2::url::ParseError| {
            IdentityError::Config(format!("{what}: {err}"))
        };

        let client = BasicClient::new(ClientId::new(endpoints.client_id))
            .set_client_secret(ClientSecret::new(endpoints.client_secret))
            .set_auth_uri(AuthUrl::new(endpoints.auth_url).map_err(|e| invalid("auth url", e))?)
            .set_token_uri(
                TokenUrl::new(endpoints.token_url).map_err(|e| invalid("token url", e))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(endpoints.redirect_url).map_err(|e| invalid("redirect url", e))?,
            );

        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            tag: endpoints.tag,
            client,
            http,
            userinfo_url: endpoints.userinfo_url,
            scopes: endpoints.scopes,
        })
    }
}

#[async_trait]
impl IdentityProvider for OAuthIdentityProvider {
    fn tag(&self) -> &str {
        self.tag
    }

    fn authorize_url(&self, state: &str) -> String {
        let state = state.to_string();
        let (url, _) = self
            .client
            .authorize_url(move || CsrfToken::new(state))
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .url();
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<UserProfile, IdentityError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| IdentityError::TokenExchange(e.to_string()))?;

        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(token.access_token().secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::UserInfoStatus {
                status: status.as_u16(),
                body,
            });
        }

        let info: UserInfo = response.json().await?;
        debug!(provider = self.tag, subject = %info.sub, "fetched user profile");
        info.into_profile()
    }
}
