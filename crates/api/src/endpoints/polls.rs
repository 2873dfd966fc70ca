//! Poll endpoints: admin management, respondent listing, and vote
//! submission.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tallysheet_common::{AppResult, Paginated};
use tallysheet_core::{Actor, PollDraft, PollInput, PollRecord, VoteSubmission};

use crate::{
    extractors::{AuthActor, Pagination},
    middleware::AppState,
    response::{ApiResponse, created, ok},
};

/// Poll response with counters, for admin views.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub id: String,
    pub sheet_id: String,
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
    pub poll_type: String,
    pub categories: Vec<String>,
    pub participant: i32,
    pub votes: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<String>,
}

impl From<PollRecord> for PollResponse {
    fn from(record: PollRecord) -> Self {
        let poll = record.poll;
        Self {
            id: poll.id,
            sheet_id: poll.sheet_id,
            title: poll.title,
            description: poll.description,
            options: decode_strings(&poll.options),
            poll_type: poll.poll_type.as_str().to_string(),
            categories: decode_strings(&poll.categories),
            participant: poll.participant_count,
            votes: record.votes,
            responses: record.responses,
        }
    }
}

/// Poll response without counters, for respondents.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPollResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
    pub poll_type: String,
}

impl From<PollRecord> for PublicPollResponse {
    fn from(record: PollRecord) -> Self {
        let poll = record.poll;
        Self {
            id: poll.id,
            title: poll.title,
            description: poll.description,
            options: decode_strings(&poll.options),
            poll_type: poll.poll_type.as_str().to_string(),
        }
    }
}

fn decode_strings(value: &serde_json::Value) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// Create poll request.
#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    /// Owning sheet.
    pub sheet_id: String,
    /// Poll payload.
    #[serde(flatten)]
    pub poll: PollInput,
}

/// Create a poll under a sheet the actor may manage.
async fn create_poll(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Json(req): Json<CreatePollRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    let draft = PollDraft::validate(req.poll)?;
    authorize_sheet(&state, &actor, &req.sheet_id).await?;

    let record = state.poll_service.create(&req.sheet_id, draft).await?;
    Ok(created(PollResponse::from(record)))
}

/// Edit a poll on a sheet the actor may manage.
async fn edit_poll(
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(input): Json<PollInput>,
) -> AppResult<ApiResponse<PollResponse>> {
    let draft = PollDraft::validate(input)?;

    let existing = state.poll_service.get(&id).await?;
    authorize_sheet(&state, &actor, &existing.poll.sheet_id).await?;

    let record = state.poll_service.edit(&id, draft).await?;
    Ok(ApiResponse::ok(record.into()))
}

/// Delete one poll.
async fn delete_poll(
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl axum::response::IntoResponse> {
    let existing = state.poll_service.get(&id).await?;
    authorize_sheet(&state, &actor, &existing.poll.sheet_id).await?;

    state.poll_service.delete_by_id(&id).await?;
    Ok(ok())
}

/// List a sheet's polls with counters. Owner or super-admin.
pub async fn list_sheet_polls(
    AuthActor(actor): AuthActor,
    Path(sheet_id): Path<String>,
    Pagination(page): Pagination,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Paginated<PollResponse>>> {
    authorize_sheet(&state, &actor, &sheet_id).await?;

    let (records, total) = state.poll_service.list_by_sheet(&sheet_id, page).await?;
    let items = records.into_iter().map(PollResponse::from).collect();
    Ok(ApiResponse::ok(Paginated::new(items, page, total)))
}

/// Delete every poll under a sheet. Owner or super-admin.
pub async fn delete_sheet_polls(
    AuthActor(actor): AuthActor,
    Path(sheet_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl axum::response::IntoResponse> {
    authorize_sheet(&state, &actor, &sheet_id).await?;

    state.poll_service.delete_by_sheet(&sheet_id).await?;
    Ok(ok())
}

/// List a sheet's polls without counters, for respondents. Anonymous.
pub async fn list_sheet_polls_public(
    Path(sheet_id): Path<String>,
    Pagination(page): Pagination,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Paginated<PublicPollResponse>>> {
    let (records, total) = state.poll_service.list_by_sheet(&sheet_id, page).await?;
    let items = records.into_iter().map(PublicPollResponse::from).collect();
    Ok(ApiResponse::ok(Paginated::new(items, page, total)))
}

/// Submit one anonymous vote or opinion.
async fn submit_vote(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(submission): Json<VoteSubmission>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.vote_service.submit(&id, submission).await?;
    Ok(ApiResponse::ok(
        serde_json::json!({ "message": "vote submitted" }),
    ))
}

/// Sheet access check shared by the poll management handlers: resolving
/// the sheet through the sheet service enforces owner-or-super-admin.
async fn authorize_sheet(state: &AppState, actor: &Actor, sheet_id: &str) -> AppResult<()> {
    state.sheet_service.get_by_id(actor, sheet_id).await?;
    Ok(())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_poll))
        .route("/{id}", axum::routing::put(edit_poll).delete(delete_poll))
        .route("/{id}/vote", post(submit_vote))
}
