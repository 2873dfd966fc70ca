//! Sheet endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Serialize;
use tallysheet_common::{AppResult, Paginated};
use tallysheet_core::{CreateSheetInput, SheetListItem};
use tallysheet_db::entities::sheet;

use crate::{
    endpoints::polls::PollResponse,
    extractors::{AuthActor, Pagination},
    middleware::AppState,
    response::{ApiResponse, created, ok},
};

/// Sheet response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub venue: String,
    pub description: String,
    pub status: sheet::SheetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<sheet::Model> for SheetResponse {
    fn from(sheet: sheet::Model) -> Self {
        Self {
            id: sheet.id,
            owner_id: sheet.owner_id,
            title: sheet.title,
            venue: sheet.venue,
            description: sheet.description,
            status: sheet.status,
            approved_by: sheet.approved_by,
            approved_at: sheet.approved_at.map(|t| t.to_rfc3339()),
            created_at: sheet.created_at.to_rfc3339(),
            updated_at: sheet.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Create sheet response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSheetResponse {
    pub message: String,
    pub sheet: SheetResponse,
    pub polls: Vec<PollResponse>,
}

/// Create a sheet, optionally bundling polls.
async fn create_sheet(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Json(input): Json<CreateSheetInput>,
) -> AppResult<impl axum::response::IntoResponse> {
    let (sheet, polls) = state.sheet_service.create(&actor, input).await?;

    let message = if sheet.status == sheet::SheetStatus::Pending {
        "sheet submitted for approval"
    } else {
        "sheet published"
    };

    Ok(created(CreateSheetResponse {
        message: message.to_string(),
        sheet: sheet.into(),
        polls: polls.into_iter().map(PollResponse::from).collect(),
    }))
}

/// List sheets visible to the actor.
async fn list_sheets(
    AuthActor(actor): AuthActor,
    Pagination(page): Pagination,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Paginated<SheetListItem>>> {
    let (items, total) = state.sheet_service.list(&actor, page).await?;
    Ok(ApiResponse::ok(Paginated::new(items, page, total)))
}

/// Get one sheet.
async fn get_sheet(
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SheetResponse>> {
    let sheet = state.sheet_service.get_by_id(&actor, &id).await?;
    Ok(ApiResponse::ok(sheet.into()))
}

/// Delete a sheet and its polls.
async fn delete_sheet(
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.sheet_service.delete(&actor, &id).await?;
    Ok(ok())
}

/// Mark a sheet finished (idempotent).
async fn finish_sheet(
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SheetResponse>> {
    let sheet = state.sheet_service.finish(&actor, &id).await?;
    Ok(ApiResponse::ok(sheet.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sheets).post(create_sheet))
        .route("/{id}", get(get_sheet).delete(delete_sheet))
        .route("/{id}/finish", put(finish_sheet))
        .route(
            "/{id}/polls",
            get(super::polls::list_sheet_polls).delete(super::polls::delete_sheet_polls),
        )
        .route("/{id}/polls/public", get(super::polls::list_sheet_polls_public))
}
