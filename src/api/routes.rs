use axum::{
    middleware,
    routing::{get, patch, post, put},
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
        // Users and profiles
        .route("/users", get(handlers::list_users))
        .route("/users/:user_id/profile", get(handlers::get_profile))
        .route("/users/:user_id/preferences", put(handlers::set_preferences))
        .route("/users/:user_id/watched", post(handlers::add_watched))
        .route(
            "/users/:user_id/watched/:movie_id",
            patch(handlers::update_rating),
        )
        // Recommendations
        .route(
            "/users/:user_id/recommendations",
            get(handlers::get_recommendations),
        )
        // Catalog
        .route("/genres", get(handlers::list_genres))
        .route("/movies/search", get(handlers::search_movies))
        .route("/movies/:movie_id", get(handlers::movie_details))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
