//! Notification endpoints: the super-admin approval queue.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Serialize;
use tallysheet_common::{AppResult, Paginated};
use tallysheet_core::Decision;
use tallysheet_db::entities::notification;

use crate::{
    extractors::{AuthActor, Pagination},
    middleware::AppState,
    response::ApiResponse,
};

/// Notification response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub kind: notification::NotificationKind,
    pub subject_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_venue: Option<String>,
    pub status: notification::NotificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            subject_id: n.subject_id,
            user_id: n.user_id,
            sheet_id: n.sheet_id,
            user_name: n.user_name,
            user_phone: n.user_phone,
            user_organization: n.user_organization,
            sheet_title: n.sheet_title,
            sheet_venue: n.sheet_venue,
            status: n.status,
            resolved_by: n.resolved_by,
            created_at: n.created_at.to_rfc3339(),
            updated_at: n.updated_at.to_rfc3339(),
        }
    }
}

/// List the pending queue.
async fn list_pending(
    AuthActor(actor): AuthActor,
    Pagination(page): Pagination,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Paginated<NotificationResponse>>> {
    let (items, total) = state.approval_service.list_pending(&actor, page).await?;
    let items = items.into_iter().map(NotificationResponse::from).collect();
    Ok(ApiResponse::ok(Paginated::new(items, page, total)))
}

/// Approve a pending notification.
async fn approve(
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<NotificationResponse>> {
    let resolved = state
        .approval_service
        .resolve(&actor, &id, Decision::Approve)
        .await?;
    Ok(ApiResponse::ok(resolved.into()))
}

/// Reject a pending notification.
async fn reject(
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<NotificationResponse>> {
    let resolved = state
        .approval_service
        .resolve(&actor, &id, Decision::Reject)
        .await?;
    Ok(ApiResponse::ok(resolved.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pending))
        .route("/{id}/approve", post(approve))
        .route("/{id}/reject", post(reject))
}
