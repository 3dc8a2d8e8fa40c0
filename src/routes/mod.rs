mod common;
mod todo;

pub use common::common_routes_with_ready;
pub use todo::todo_routes;

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Prefix the todo routes are served under.
pub const API_PREFIX: &str = "/api/v1";

/// Health routes at the root, todo routes under [`API_PREFIX`], with body limit and request tracing.
/// Bodies over `body_limit` are rejected by the JSON extractor, so they get the error envelope.
pub fn api_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest(API_PREFIX, todo_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}
