pub mod paths;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore, service::CookieController};

use crate::AppState;
use crate::handlers::{admin, api, auth, pages};

/// Builds the full application: routes, static assets, sessions, tracing and
/// the per-request timeout.
pub fn create_app<Store, C>(state: AppState, session_layer: SessionManagerLayer<Store, C>) -> Router
where
    Store: SessionStore + Clone,
    C: CookieController + Send + Sync + 'static,
{
    let assets = ServeDir::new(&state.config.views.assets_dir);
    let request_timeout = state.config.server.request_timeout;

    Router::new()
        .merge(create_page_routes())
        .merge(create_api_routes())
        .merge(create_auth_routes())
        .merge(create_admin_routes())
        .nest_service(paths::ASSETS, assets)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                ))
                .layer(session_layer),
        )
        .with_state(state)
}

fn create_page_routes() -> Router<AppState> {
    Router::new()
        .route(paths::pages::INDEX, get(pages::index))
        .route(paths::pages::SEARCH_BOOKS, get(pages::search_books))
        .route(paths::pages::BOOKS_BY_AUTHOR, get(pages::books_by_author))
        .route(paths::pages::BOOK_INFO, get(pages::book_info))
        .route(paths::pages::ERROR, get(pages::error_page))
}

fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route(paths::api::BOOKS, get(api::books_list))
        .route(paths::api::BOOKS_COUNT, get(api::books_count))
        .route(paths::api::LIKES_COUNT, get(api::likes_count))
        .route(paths::api::LIKE, post(api::like))
        .route(paths::api::UNLIKE, post(api::unlike))
        .route(paths::api::LIKE_STATUS, get(api::like_status))
        .route(paths::api::CHECK_LIKE, get(api::like_status))
}

fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route(paths::auth::LOGIN, get(auth::login))
        .route(paths::auth::LOGIN_ALIAS, get(auth::login))
        .route(paths::auth::CALLBACK, get(auth::callback))
}

fn create_admin_routes() -> Router<AppState> {
    Router::new().route(paths::admin::INIT_DB, get(admin::init_db))
}
