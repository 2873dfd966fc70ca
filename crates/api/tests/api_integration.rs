//! API integration tests.
//!
//! These tests exercise the router, extractors, and error mapping over a
//! mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tallysheet_api::{
    middleware::{AppState, TokenKey, auth_middleware},
    router as api_router,
};
use tallysheet_core::{
    ApprovalService, PollService, SheetService, UserService, VoteService,
};
use tallysheet_db::entities::poll::{self, PollType};
use tallysheet_db::repositories::{
    NotificationRepository, PollRepository, SheetRepository, UserRepository, VoteRepository,
};
use tower::ServiceExt;

fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let sheet_repo = SheetRepository::new(Arc::clone(&db));
    let poll_repo = PollRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    let approval_service = ApprovalService::new(
        notification_repo,
        user_repo.clone(),
        sheet_repo.clone(),
    );
    let poll_service = PollService::new(poll_repo.clone(), vote_repo.clone());
    let vote_service = VoteService::new(poll_repo, vote_repo);
    let sheet_service = SheetService::new(
        sheet_repo,
        user_repo.clone(),
        poll_service.clone(),
        approval_service.clone(),
    );
    let user_service = UserService::new(user_repo, approval_service.clone());

    AppState {
        user_service,
        sheet_service,
        poll_service,
        vote_service,
        approval_service,
        token_key: TokenKey::new("test-secret"),
    }
}

fn create_app(db: DatabaseConnection) -> Router {
    let state = create_test_state(db);
    Router::new()
        .nest("/api/v1", api_router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn empty_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_sheets_listing_requires_auth() {
    let app = create_app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/sheets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_notifications_require_auth() {
    let app = create_app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/notifications")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let app = create_app(empty_mock_db());

    let payload = serde_json::json!({
        "name": "New Admin",
        "phone": "5559876",
        "organization": "Org",
        "password": "short",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_vote_with_malformed_poll_id_is_invalid_argument() {
    // Anonymous route; the malformed id is rejected before any lookup.
    let app = create_app(empty_mock_db());

    let payload = serde_json::json!({ "votes": [1, 0] });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/polls/not-a-ulid/vote")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_public_poll_listing_is_anonymous_and_counter_free() {
    let test_poll = poll::Model {
        id: "01hzqy4v7s0000000000000003".to_string(),
        sheet_id: "01hzqy4v7s0000000000000002".to_string(),
        title: "Your thoughts?".to_string(),
        description: String::new(),
        options: serde_json::json!(["Free text"]),
        categories: serde_json::json!(["general"]),
        poll_type: PollType::Opinion,
        participant_count: 4,
        created_at: chrono::Utc::now().into(),
        updated_at: None,
    };

    let mut count_row = std::collections::BTreeMap::new();
    count_row.insert("num_items".to_string(), sea_orm::Value::BigInt(Some(1)));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row]])
        .append_query_results([[test_poll]])
        .append_query_results([Vec::<tallysheet_db::entities::opinion_response::Model>::new()])
        .into_connection();

    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/sheets/01hzqy4v7s0000000000000002/polls/public")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["pagination"]["total_items"], 1);
    let item = &body["data"]["data"][0];
    assert_eq!(item["pollType"], "opinion");
    // Respondent view carries no counters.
    assert!(item.get("votes").is_none());
    assert!(item.get("participant").is_none());
}
