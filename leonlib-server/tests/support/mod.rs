#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::{TestResponse, TestServer};
use serde_json::Value;
use tempfile::TempDir;
use tower_sessions::MemoryStore;

use leonlib_core::database::memory::InMemoryLibrary;
use leonlib_core::database::BooksRepository;
use leonlib_core::{CatalogLoader, NewBook, UserProfile};
use leonlib_server::auth::{IdentityError, IdentityProvider};
use leonlib_server::infra::{config::Config, sessions::session_layer};
use leonlib_server::routes::{self, paths};
use leonlib_server::views::{Page, PageRenderer};
use leonlib_server::AppState;

pub const TEST_USER: &str = "google-oauth2|4242";
pub const REJECTED_CODE: &str = "rejected-code";

/// Identity provider that accepts every code except [`REJECTED_CODE`].
#[derive(Debug)]
pub struct FakeIdentityProvider;

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    fn tag(&self) -> &str {
        "Google"
    }

    fn authorize_url(&self, state: &str) -> String {
        format!("https://idp.test/authorize?client_id=test&state={state}")
    }

    async fn exchange_code(&self, code: &str) -> Result<UserProfile, IdentityError> {
        if code == REJECTED_CODE {
            return Err(IdentityError::TokenExchange("invalid_grant".to_string()));
        }
        Ok(UserProfile {
            subject: TEST_USER.to_string(),
            email: "leon@example.com".to_string(),
            name: "Leon".to_string(),
        })
    }
}

/// Renders every page as its JSON view model so tests can inspect it.
#[derive(Debug)]
pub struct JsonRenderer;

impl PageRenderer for JsonRenderer {
    fn render(&self, page: &Page) -> anyhow::Result<String> {
        Ok(serde_json::to_string(page)?)
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub library: Arc<InMemoryLibrary>,
    pub catalog_dir: TempDir,
}

impl TestApp {
    pub async fn seed(&self, books: &[(&str, &str)]) {
        let rows: Vec<NewBook> = books
            .iter()
            .map(|(title, author)| NewBook {
                title: title.to_string(),
                author: author.to_string(),
                description: None,
                read: false,
                added_on: None,
                goodreads_link: None,
                image: None,
            })
            .collect();
        self.library.insert_books(&rows).await.unwrap();
    }

    /// Completes the provider callback so the cookie jar holds an
    /// authenticated session.
    pub async fn sign_in(&self) {
        self.server
            .get(paths::auth::CALLBACK)
            .add_query_param("code", "valid-code")
            .add_query_param("state", "ignored")
            .await
            .assert_status_ok();
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(&[])
}

pub fn build_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let catalog_dir = tempfile::tempdir().unwrap();
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let mut vars: HashMap<String, String> = HashMap::from([
        ("SESSION_SECRET".into(), "integration-test-secret".into()),
        (
            "ASSETS_DIR".into(),
            crate_dir.join("assets").display().to_string(),
        ),
        (
            "TEMPLATE_DIR".into(),
            crate_dir.join("templates").display().to_string(),
        ),
        (
            "LEONLIB_CATALOG_PATH".into(),
            catalog_dir.path().join("books_db.toml").display().to_string(),
        ),
        (
            "LEONLIB_IMAGES_DIR".into(),
            catalog_dir.path().join("images").display().to_string(),
        ),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let layer = session_layer(&config.session, MemoryStore::default()).unwrap();

    let library = Arc::new(InMemoryLibrary::new());
    let state = AppState {
        catalog: Arc::new(CatalogLoader::new(
            config.catalog.catalog_path.clone(),
            config.catalog.images_dir.clone(),
        )),
        config: Arc::new(config),
        books: library.clone(),
        users: library.clone(),
        likes: library.clone(),
        identity: Arc::new(FakeIdentityProvider),
        renderer: Arc::new(JsonRenderer),
    };

    let server = TestServer::builder()
        .save_cookies()
        .build(routes::create_app(state, layer))
        .unwrap();

    TestApp {
        server,
        library,
        catalog_dir,
    }
}

/// Page view model produced by [`JsonRenderer`].
pub fn page(response: &TestResponse) -> Value {
    serde_json::from_str(&response.text()).unwrap()
}

pub fn location(response: &TestResponse) -> String {
    response
        .header("location")
        .to_str()
        .unwrap()
        .to_string()
}
