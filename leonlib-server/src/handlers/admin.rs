use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::infra::{app_state::AppState, errors::AppError};

/// Bulk loads the configured catalog. Answers `{"status":"OK"}` or, when
/// any entry fails, `{"status":"error"}` with nothing inserted.
pub async fn init_db(State(state): State<AppState>) -> Response {
    if !state.config.catalog.initdb_enabled {
        warn!("catalog initialization requested while disabled");
        return AppError::forbidden("Catalog initialization is disabled").into_response();
    }

    match state.catalog.load_into(state.books.as_ref()).await {
        Ok(report) => {
            info!(inserted = report.inserted, "catalog initialized");
            Json(json!({ "status": "OK" })).into_response()
        }
        Err(err) => {
            error!(
                catalog = %state.catalog.catalog_path().display(),
                error = %err,
                "catalog initialization failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error" })),
            )
                .into_response()
        }
    }
}
