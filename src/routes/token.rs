//! Token routes

use axum::{routing::post, Router};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Create token issuance and rotation routes
pub fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(handlers::issue_tokens))
        .route("/refresh", post(handlers::refresh_tokens))
}

/// Token routes bound to state, with request tracing applied
pub fn app(state: AppState) -> Router {
    token_routes()
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}
