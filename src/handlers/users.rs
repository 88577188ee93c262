// User handlers
// Read-only HTTP handlers over the users table

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use crate::{error::ApiResult, state::AppState};

/// The single name pair served by `/absurd`.
pub const ABSURD_FIRSTNAME: &str = "Zaphod";
pub const ABSURD_LASTNAME: &str = "Beeblebrox";

/// List every user
/// GET /names, GET /users
pub async fn list_names(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    info!("Fetching all users");

    let users = state.db.list_users().await?;

    info!("Retrieved {} users", users.len());
    Ok((StatusCode::OK, Json(users)))
}

/// List users named Zaphod Beeblebrox
/// GET /absurd
pub async fn list_absurd(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    info!("Fetching users named {} {}", ABSURD_FIRSTNAME, ABSURD_LASTNAME);

    let users = state
        .db
        .find_users_by_name(ABSURD_FIRSTNAME, ABSURD_LASTNAME)
        .await?;

    info!("Retrieved {} matching users", users.len());
    Ok((StatusCode::OK, Json(users)))
}
