//! HTTP handlers and routing

pub mod book_instances;
pub mod health;

use axum::{
    response::Redirect,
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{services::book_instances::LIST_URL, AppState};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/", get(|| async { Redirect::to(LIST_URL) }))
        .route("/bookinstances", get(book_instances::list))
        .route(
            "/bookinstance/create",
            get(book_instances::create_get).post(book_instances::create_post),
        )
        .route("/bookinstance/:id", get(book_instances::detail))
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::delete_get).post(book_instances::delete_post),
        )
        .route(
            "/bookinstance/:id/update",
            get(book_instances::update_get).post(book_instances::update_post),
        );

    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}
