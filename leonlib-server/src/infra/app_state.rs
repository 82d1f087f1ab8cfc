use std::{fmt, sync::Arc};

use axum::response::Html;

use crate::auth::IdentityProvider;
use crate::infra::config::Config;
use crate::infra::errors::{AppError, AppResult};
use crate::views::{Page, PageContext, PageRenderer};
use leonlib_core::CatalogLoader;
use leonlib_core::database::{BooksRepository, LikesRepository, UsersRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub books: Arc<dyn BooksRepository>,
    pub users: Arc<dyn UsersRepository>,
    pub likes: Arc<dyn LikesRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub renderer: Arc<dyn PageRenderer>,
    pub catalog: Arc<CatalogLoader>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn page_context(&self, logged_in: bool) -> PageContext {
        PageContext::new(self.config.views.captcha_site_key.clone(), logged_in)
    }

    pub fn render(&self, page: &Page) -> AppResult<Html<String>> {
        self.renderer.render(page).map(Html).map_err(|err| {
            tracing::error!(template = page.template_name(), error = ?err, "failed to render page");
            AppError::internal("Failed to render page")
        })
    }
}
