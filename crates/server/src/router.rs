use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    let body_limit = app_state.config.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/upload-pdf",
            post(handlers::upload_pdf_handler).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/process-pdf",
            post(handlers::process_pdf_handler).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/search/pages", post(handlers::search_pages_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
