//! Route configuration.

use crate::auth::require_api_key;
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Maximum request body size for uploads (16 MiB).
///
/// Uploads are resized to a small fixed thumbnail, so anything near this
/// limit is already unreasonable as input.
///
/// **Note**: If running behind a reverse proxy (nginx, haproxy, etc.), ensure
/// the proxy's `client_max_body_size` or equivalent is >= this value to avoid
/// inconsistent 413 responses where the proxy rejects before we can.
const MAX_UPLOAD_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    // Read path: no authentication.
    let open_routes = Router::new()
        .route("/api/images", get(handlers::list_images))
        .route("/api/images/{image_id}", get(handlers::get_image));

    // Mutating path: every route sits behind the API key middleware.
    let protected_routes = Router::new()
        .route("/api/images", post(handlers::upload_image))
        .route("/api/images/{image_id}", delete(handlers::delete_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_SIZE))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    // Both directories are also exposed read-only as plain static trees,
    // independent of the metadata-driven get path.
    Router::new()
        .merge(open_routes)
        .merge(protected_routes)
        .nest_service("/images", ServeDir::new(state.files.project_dir()))
        .nest_service("/uploaded", ServeDir::new(state.files.upload_dir()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
