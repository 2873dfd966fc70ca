//! Admin account endpoints, super-admin only.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use tallysheet_common::{AppResult, Paginated};
use tallysheet_db::entities::user;

use crate::{
    extractors::{AuthActor, Pagination},
    middleware::AppState,
    response::{ApiResponse, ok},
};

/// Admin account response. Credentials never leave the service.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub organization: String,
    pub role: user::Role,
    pub is_verified: bool,
    pub created_at: String,
}

impl From<user::Model> for AdminResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            phone: user.phone,
            organization: user.organization,
            role: user.role,
            is_verified: user.is_verified,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Verification override request.
#[derive(Debug, Deserialize)]
pub struct SetVerificationRequest {
    /// Target verification state.
    pub is_verified: bool,
}

/// List admin accounts.
async fn list_admins(
    AuthActor(actor): AuthActor,
    Pagination(page): Pagination,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Paginated<AdminResponse>>> {
    let (users, total) = state.user_service.list_admins(&actor, page).await?;
    let items = users.into_iter().map(AdminResponse::from).collect();
    Ok(ApiResponse::ok(Paginated::new(items, page, total)))
}

/// Manually override an account's verification.
async fn set_verification(
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<SetVerificationRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .user_service
        .set_verification(&actor, &id, req.is_verified)
        .await?;
    Ok(ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admins))
        .route("/{id}/verification", put(set_verification))
}
