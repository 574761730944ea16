use axum::{
    middleware,
    routing::{delete, get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/movies", get(handlers::browse_movies))
        .route("/movies/search", get(handlers::search_movies))
        .route("/movies/:movie_id", get(handlers::get_movie))
        // Per-user views
        .route(
            "/users/:user_id/recommendations",
            get(handlers::recommendations),
        )
        .route("/users/:user_id/rewatch", get(handlers::rewatch))
        // Watch log
        .route(
            "/users/:user_id/history",
            get(handlers::get_history).post(handlers::add_to_history),
        )
        .route(
            "/users/:user_id/history/:record_id",
            delete(handlers::remove_from_history),
        )
        // Watch later
        .route("/users/:user_id/watch-later", get(handlers::get_watch_later))
        .route(
            "/users/:user_id/watch-later/:movie_id",
            put(handlers::add_to_watch_later).delete(handlers::remove_from_watch_later),
        )
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
