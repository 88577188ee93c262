use std::time::Duration;

use axum::{routing::get, Router};

use crate::{
    handlers::{
        health_check, index,
        users::{list_absurd, list_names},
    },
    middleware::create_middleware_stack,
    state::AppState,
};

/// Create the Axum router with all endpoints and middleware
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/names", get(list_names))
        // Older clients still ask for /users
        .route("/users", get(list_names))
        .route("/absurd", get(list_absurd))
        .with_state(state)
        .layer(create_middleware_stack(request_timeout))
}
