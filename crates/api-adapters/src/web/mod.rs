//! # axum transport
//!
//! Routes, extractors and error mapping for the JSON API mounted under `/api`.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Builds the `/api` router.
///
/// # Developer Note
/// Middleware is applied separately by [`middleware::standard_layers`] so
/// tests can drive the bare routes.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Users
        .route("/user/{nickname}/create", post(handlers::users::create))
        .route(
            "/user/{nickname}/profile",
            get(handlers::users::profile).post(handlers::users::update),
        )
        // Forums
        .route("/forum/create", post(handlers::forums::create))
        .route("/forum/{slug}/details", get(handlers::forums::details))
        .route("/forum/{slug}/create", post(handlers::forums::create_thread))
        .route("/forum/{slug}/threads", get(handlers::forums::threads))
        .route("/forum/{slug}/users", get(handlers::forums::users))
        // Threads
        .route(
            "/thread/{slug_or_id}/create",
            post(handlers::threads::create_posts),
        )
        .route(
            "/thread/{slug_or_id}/details",
            get(handlers::threads::details).post(handlers::threads::update),
        )
        .route("/thread/{slug_or_id}/posts", get(handlers::threads::posts))
        .route("/thread/{slug_or_id}/vote", post(handlers::threads::vote))
        // Posts
        .route(
            "/post/{id}/details",
            get(handlers::posts::details).post(handlers::posts::update),
        )
        // Service
        .route("/service/clear", post(handlers::service::clear))
        .route("/service/status", get(handlers::service::status));

    Router::new().nest("/api", api).with_state(state)
}
