//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `tallysheet_test`)
//!   `TEST_DB_PASSWORD` (default: `tallysheet_test`)
//!   `TEST_DB_NAME` (default: `tallysheet_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use tallysheet_common::PageQuery;
use tallysheet_db::entities::{poll, poll::PollType, sheet, sheet::SheetStatus, user, user::Role};
use tallysheet_db::repositories::{PollRepository, SheetRepository, UserRepository, VoteRepository};
use tallysheet_db::test_utils::{TestDatabase, TestDbConfig};

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_are_idempotent() {
    // create_unique already migrated; a second run must be a no-op.
    let db = TestDatabase::create_unique().await.unwrap();
    let result = tallysheet_db::migrate(db.connection()).await;
    assert!(result.is_ok(), "Re-running migrations failed: {:?}", result.err());
    db.drop_database().await.unwrap();
}

async fn seed_poll(db: &TestDatabase) -> (PollRepository, VoteRepository, String) {
    let conn = db.connection_arc();
    let user_repo = UserRepository::new(Arc::clone(&conn));
    let sheet_repo = SheetRepository::new(Arc::clone(&conn));
    let poll_repo = PollRepository::new(Arc::clone(&conn));
    let vote_repo = VoteRepository::new(Arc::clone(&conn));

    let now = Utc::now();
    let owner = user_repo
        .create(user::ActiveModel {
            id: Set("01hzqy4v7s0000000000000001".to_string()),
            name: Set("Owner".to_string()),
            phone: Set("5550001".to_string()),
            organization: Set("Org".to_string()),
            password_hash: Set("$argon2id$stub".to_string()),
            role: Set(Role::VerifiedAdmin),
            is_verified: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    let sheet = sheet_repo
        .create(sheet::ActiveModel {
            id: Set("01hzqy4v7s0000000000000002".to_string()),
            owner_id: Set(owner.id),
            title: Set("Town Hall".to_string()),
            venue: Set("Hall A".to_string()),
            description: Set(String::new()),
            status: Set(SheetStatus::Published),
            approved_by: Set(None),
            approved_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    let created = poll_repo
        .create(poll::ActiveModel {
            id: Set("01hzqy4v7s0000000000000003".to_string()),
            sheet_id: Set(sheet.id),
            title: Set("Lunch preference".to_string()),
            description: Set(String::new()),
            options: Set(json!(["Pizza", "Sushi"])),
            categories: Set(json!(["food"])),
            poll_type: Set(PollType::SingleChoice),
            participant_count: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    vote_repo.init_slots(&created.id, 2).await.unwrap();

    (poll_repo, vote_repo, created.id)
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_vote_increments_do_not_lose_updates() {
    let db = TestDatabase::create_unique().await.unwrap();
    let (poll_repo, vote_repo, poll_id) = seed_poll(&db).await;

    // Two concurrent submissions on different slots.
    let a = {
        let vote_repo = vote_repo.clone();
        let poll_repo = poll_repo.clone();
        let poll_id = poll_id.clone();
        tokio::spawn(async move {
            vote_repo.apply_deltas(&poll_id, &[1, 0]).await.unwrap();
            poll_repo.record_submission(&poll_id, Utc::now()).await.unwrap();
        })
    };
    let b = {
        let vote_repo = vote_repo.clone();
        let poll_repo = poll_repo.clone();
        let poll_id = poll_id.clone();
        tokio::spawn(async move {
            vote_repo.apply_deltas(&poll_id, &[0, 1]).await.unwrap();
            poll_repo.record_submission(&poll_id, Utc::now()).await.unwrap();
        })
    };
    a.await.unwrap();
    b.await.unwrap();

    let counts = vote_repo.load_counts(&poll_id).await.unwrap();
    assert_eq!(counts, vec![1, 1]);

    let poll = poll_repo.get_by_id(&poll_id).await.unwrap();
    assert_eq!(poll.participant_count, 2);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_poll_listing_paginates() {
    let db = TestDatabase::create_unique().await.unwrap();
    let (poll_repo, _, poll_id) = seed_poll(&db).await;

    let poll = poll_repo.get_by_id(&poll_id).await.unwrap();
    let (polls, total) = poll_repo
        .list_by_sheet(&poll.sheet_id, PageQuery::new(Some(1), Some(10)))
        .await
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(polls.len(), 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_resize_slots_preserves_surviving_counts() {
    let db = TestDatabase::create_unique().await.unwrap();
    let (_, vote_repo, poll_id) = seed_poll(&db).await;

    vote_repo.apply_deltas(&poll_id, &[3, 5]).await.unwrap();

    // Grow to three options: existing counters survive, the new slot
    // starts at zero.
    vote_repo.resize_slots(&poll_id, 3).await.unwrap();
    assert_eq!(vote_repo.load_counts(&poll_id).await.unwrap(), vec![3, 5, 0]);

    // Shrink to one: excess rows are dropped.
    vote_repo.resize_slots(&poll_id, 1).await.unwrap();
    assert_eq!(vote_repo.load_counts(&poll_id).await.unwrap(), vec![3]);

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
}
