use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};

use sha2::{Digest, Sha512};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8180;
pub const SESSION_COOKIE_NAME: &str = "user-session";
const SESSION_INACTIVITY: Duration = Duration::from_secs(60 * 60 * 24 * 7);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Server configuration, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub identity: IdentityConfig,
    pub views: ViewsConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub enum DatabaseSource {
    Url(String),
    Parts {
        host: Option<String>,
        port: Option<u16>,
        user: Option<String>,
        password: Option<String>,
        database: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub source: DatabaseSource,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match &self.source {
            DatabaseSource::Url(url) => {
                PgConnectOptions::from_str(url).map_err(|_| ConfigError::Invalid {
                    key: "DATABASE_URL",
                    value: "<redacted>".to_string(),
                })
            }
            DatabaseSource::Parts {
                host,
                port,
                user,
                password,
                database,
            } => {
                let Some(database) = database else {
                    return Err(ConfigError::Missing("DATABASE_URL or PGDATABASE"));
                };

                let mut options = PgConnectOptions::new().database(database);
                if let Some(host) = host {
                    options = options.host(host);
                }
                if let Some(port) = port {
                    options = options.port(*port);
                }
                if let Some(user) = user {
                    options = options.username(user);
                }
                if let Some(password) = password {
                    options = options.password(password);
                }
                Ok(options)
            }
        }
    }

    /// Where the connection comes from, for logs.
    pub fn describe_source(&self) -> &'static str {
        match self.source {
            DatabaseSource::Url(_) => "DATABASE_URL",
            DatabaseSource::Parts { .. } => "PG env",
        }
    }
}

#[derive(Clone)]
pub struct SessionConfig {
    secret: Option<String>,
    pub secure_cookies: bool,
    pub cookie_name: String,
    pub inactivity: Duration,
}

impl SessionConfig {
    /// 64-byte cookie signing key derived from `SESSION_SECRET`.
    pub fn signing_key(&self) -> Result<[u8; 64], ConfigError> {
        let secret = self
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("SESSION_SECRET"))?;

        let digest = Sha512::digest(secret.as_bytes());
        let mut key = [0u8; 64];
        key.copy_from_slice(&digest);
        Ok(key)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("secure_cookies", &self.secure_cookies)
            .field("cookie_name", &self.cookie_name)
            .field("inactivity", &self.inactivity)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProviderKind {
    Google,
    Auth0,
}

impl FromStr for AuthProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "google" => Ok(Self::Google),
            "auth0" => Ok(Self::Auth0),
            other => Err(ConfigError::Invalid {
                key: "LEONLIB_AUTH_PROVIDER",
                value: other.to_string(),
            }),
        }
    }
}

/// Endpoints and credentials of the configured identity provider.
#[derive(Clone)]
pub struct ProviderEndpoints {
    pub tag: &'static str,
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
}

impl fmt::Debug for ProviderEndpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEndpoints")
            .field("tag", &self.tag)
            .field("client_id", &self.client_id)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .field("redirect_url", &self.redirect_url)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct IdentityConfig {
    pub provider: AuthProviderKind,
    pub timeout: Duration,
    google_client_id: Option<String>,
    google_client_secret: Option<String>,
    google_callback: Option<String>,
    auth0_domain: Option<String>,
    auth0_client_id: Option<String>,
    auth0_client_secret: Option<String>,
    auth0_callback: Option<String>,
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("provider", &self.provider)
            .field("timeout", &self.timeout)
            .field("auth0_domain", &self.auth0_domain)
            .finish_non_exhaustive()
    }
}

impl IdentityConfig {
    pub fn endpoints(&self) -> Result<ProviderEndpoints, ConfigError> {
        fn required(value: &Option<String>, key: &'static str) -> Result<String, ConfigError> {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        }

        match self.provider {
            AuthProviderKind::Google => Ok(ProviderEndpoints {
                tag: "Google",
                client_id: required(&self.google_client_id, "LEONLIB_GOOGLE_OAUTH_CLIENT_ID")?,
                client_secret: required(
                    &self.google_client_secret,
                    "LEONLIB_GOOGLE_OAUTH_CLIENT_SECRET",
                )?,
                auth_url: "https://accounts.google.com/o/oauth2/auth".to_string(),
                token_url: "https://oauth2.googleapis.com/token".to_string(),
                userinfo_url: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
                redirect_url: required(&self.google_callback, "LEONLIB_GOOGLE_OAUTH_CALLBACK")?,
                scopes: vec!["openid".into(), "email".into(), "profile".into()],
            }),
            AuthProviderKind::Auth0 => {
                let domain = required(&self.auth0_domain, "AUTH0_DOMAIN")?;
                let domain = domain.trim_end_matches('/');
                Ok(ProviderEndpoints {
                    tag: "Auth0",
                    client_id: required(&self.auth0_client_id, "AUTH0_CLIENT_ID")?,
                    client_secret: required(&self.auth0_client_secret, "AUTH0_CLIENT_SECRET")?,
                    auth_url: format!("https://{domain}/authorize"),
                    token_url: format!("https://{domain}/oauth/token"),
                    userinfo_url: format!("https://{domain}/userinfo"),
                    redirect_url: required(&self.auth0_callback, "AUTH0_CALLBACK_URL")?,
                    scopes: vec!["openid".into(), "profile".into(), "email".into()],
                })
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewsConfig {
    pub template_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub captcha_site_key: String,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub catalog_path: PathBuf,
    pub images_dir: PathBuf,
    pub initdb_enabled: bool,
}

impl Config {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) | Err(dotenvy::Error::Io(_)) => {}
            Err(err) => return Err(err.into()),
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let server = ServerConfig {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            request_timeout: Duration::from_secs(parse_or(
                get("LEONLIB_REQUEST_TIMEOUT_SECS"),
                "LEONLIB_REQUEST_TIMEOUT_SECS",
                30,
            )?),
        };

        let source = match get("DATABASE_URL") {
            Some(url) => DatabaseSource::Url(url),
            None => DatabaseSource::Parts {
                host: get("PGHOST"),
                port: get("PGPORT")
                    .map(|port| parse_value(&port, "PGPORT"))
                    .transpose()?,
                user: get("PGUSER"),
                password: lookup("POSTGRES_PASSWORD").filter(|v| !v.is_empty()),
                database: get("PGDATABASE"),
            },
        };
        let database = DatabaseConfig {
            source,
            max_connections: parse_or(
                get("LEONLIB_DB_MAX_CONNECTIONS"),
                "LEONLIB_DB_MAX_CONNECTIONS",
                10,
            )?,
        };

        let session = SessionConfig {
            secret: lookup("SESSION_SECRET").filter(|v| !v.is_empty()),
            secure_cookies: parse_bool(get("LEONLIB_SECURE_COOKIES"), "LEONLIB_SECURE_COOKIES", false)?,
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            inactivity: SESSION_INACTIVITY,
        };

        let identity = IdentityConfig {
            provider: get("LEONLIB_AUTH_PROVIDER")
                .as_deref()
                .unwrap_or("google")
                .parse()?,
            timeout: Duration::from_secs(parse_or(
                get("LEONLIB_IDP_TIMEOUT_SECS"),
                "LEONLIB_IDP_TIMEOUT_SECS",
                10,
            )?),
            google_client_id: get("LEONLIB_GOOGLE_OAUTH_CLIENT_ID"),
            google_client_secret: get("LEONLIB_GOOGLE_OAUTH_CLIENT_SECRET"),
            google_callback: get("LEONLIB_GOOGLE_OAUTH_CALLBACK")
                .or_else(|| get("LEONLIB_GOOGLE_OATH_CALLBACK")),
            auth0_domain: get("AUTH0_DOMAIN"),
            auth0_client_id: get("AUTH0_CLIENT_ID"),
            auth0_client_secret: get("AUTH0_CLIENT_SECRET"),
            auth0_callback: get("AUTH0_CALLBACK_URL"),
        };

        let views = ViewsConfig {
            template_dir: get("TEMPLATE_DIR").unwrap_or_else(|| "templates".into()).into(),
            assets_dir: get("ASSETS_DIR").unwrap_or_else(|| "assets".into()).into(),
            captcha_site_key: get("LEONLIB_CAPTCHA_SITE_KEY").unwrap_or_default(),
        };

        let catalog = CatalogConfig {
            catalog_path: get("LEONLIB_CATALOG_PATH")
                .unwrap_or_else(|| "library/books_db.toml".into())
                .into(),
            images_dir: get("LEONLIB_IMAGES_DIR").unwrap_or_else(|| "images".into()).into(),
            initdb_enabled: parse_bool(
                get("LEONLIB_ADMIN_INITDB_ENABLED"),
                "LEONLIB_ADMIN_INITDB_ENABLED",
                true,
            )?,
        };

        Ok(Self {
            server,
            database,
            session,
            identity,
            views,
            catalog,
        })
    }
}

fn parse_value<T: FromStr>(raw: &str, key: &'static str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => parse_value(&raw, key),
        None => Ok(default),
    }
}

fn parse_bool(raw: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}
