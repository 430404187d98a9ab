use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

/// Room for multipart boundaries and part headers on top of the photo itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize + MULTIPART_OVERHEAD;
    let uploads_route = format!("{}/:blob_name", state.config.storage.public_prefix);

    let mut router = Router::new()
        // Likes
        .route("/api/likes", get(handlers::get_all_likes))
        .route("/api/likes/top", get(handlers::top_likes_default))
        .route(
            "/api/likes/top/:limit",
            get(handlers::top_likes).post(handlers::add_like_top),
        )
        .route(
            "/api/likes/:subject/:sub_index",
            get(handlers::get_likes).post(handlers::add_like),
        )
        // Photos
        .route(
            "/api/photos/:subject/:sub_index",
            get(handlers::list_photos)
                .post(handlers::upload_photo)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/photos/:id", delete(handlers::delete_photo))
        // Stored blobs
        .route(&uploads_route, get(handlers::serve_upload))
        .route("/health", get(handlers::health));

    // Frontend bundle, with index.html for client-side routes
    if let Some(ref static_dir) = state.config.server.static_dir {
        tracing::info!(path = %static_dir.display(), "Serving frontend bundle");
        let index = ServeFile::new(static_dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(static_dir).fallback(index));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
