// Handlers module
// HTTP handlers for the character API

pub mod users;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{error::ApiResult, state::AppState};

/// Greeting handler
/// GET /
/// Answers without touching the database.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "hello": &*state.greeting })))
}

/// Health check handler
/// GET /health
/// Returns "OK" once `SELECT 1` succeeds; database failures surface as 500.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    state.db.health_check().await?;

    Ok((StatusCode::OK, "OK"))
}
