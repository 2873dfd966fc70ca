//! Signup endpoint.

use axum::{Json, Router, extract::State, routing::post};
use tallysheet_common::AppResult;
use tallysheet_core::RegisterInput;

use crate::{endpoints::admins::AdminResponse, middleware::AppState, response::created};

/// Register a new admin account. The account starts in the `new` role
/// and a signup notification lands in the super-admin queue.
async fn signup(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<impl axum::response::IntoResponse> {
    let user = state.user_service.register(input).await?;
    Ok(created(AdminResponse::from(user)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/signup", post(signup))
}
