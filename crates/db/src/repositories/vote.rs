//! Vote repository: slot counters and opinion responses.

use std::sync::Arc;

use crate::entities::{OpinionResponse, VoteSlot, opinion_response, vote_slot};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::Expr,
};
use tallysheet_common::{AppError, AppResult};

/// Vote repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Allocate zeroed counter slots `0..slot_count` for a poll.
    pub async fn init_slots(&self, poll_id: &str, slot_count: usize) -> AppResult<()> {
        if slot_count == 0 {
            return Ok(());
        }

        let slots = (0..slot_count).map(|index| vote_slot::ActiveModel {
            poll_id: Set(poll_id.to_string()),
            slot_index: Set(index as i32),
            count: Set(0),
        });

        VoteSlot::insert_many(slots)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Load a poll's counters ordered by slot index.
    pub async fn load_counts(&self, poll_id: &str) -> AppResult<Vec<i64>> {
        let slots = VoteSlot::find()
            .filter(vote_slot::Column::PollId.eq(poll_id))
            .order_by_asc(vote_slot::Column::SlotIndex)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(slots.into_iter().map(|s| s.count).collect())
    }

    /// Apply vote deltas as per-slot atomic increments.
    ///
    /// Each non-zero delta becomes one `count = count + delta` update, so
    /// concurrent submissions never lose votes. Zero deltas are skipped.
    pub async fn apply_deltas(&self, poll_id: &str, deltas: &[i64]) -> AppResult<()> {
        for (index, delta) in deltas.iter().enumerate() {
            if *delta == 0 {
                continue;
            }

            VoteSlot::update_many()
                .col_expr(
                    vote_slot::Column::Count,
                    Expr::col(vote_slot::Column::Count).add(*delta),
                )
                .filter(vote_slot::Column::PollId.eq(poll_id))
                .filter(vote_slot::Column::SlotIndex.eq(index as i32))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Resize a poll's slot set to `new_count` after an option edit.
    ///
    /// Surviving indices keep their counts; new indices start at zero;
    /// rows beyond the new option list are dropped.
    pub async fn resize_slots(&self, poll_id: &str, new_count: usize) -> AppResult<()> {
        VoteSlot::delete_many()
            .filter(vote_slot::Column::PollId.eq(poll_id))
            .filter(vote_slot::Column::SlotIndex.gte(new_count as i32))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = self.load_counts(poll_id).await?.len();
        if existing < new_count {
            let slots = (existing..new_count).map(|index| vote_slot::ActiveModel {
                poll_id: Set(poll_id.to_string()),
                slot_index: Set(index as i32),
                count: Set(0),
            });

            VoteSlot::insert_many(slots)
                .exec_without_returning(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Append opinion responses in one insert.
    pub async fn append_responses(
        &self,
        models: Vec<opinion_response::ActiveModel>,
    ) -> AppResult<()> {
        if models.is_empty() {
            return Ok(());
        }

        OpinionResponse::insert_many(models)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Load a poll's opinion responses, oldest first.
    pub async fn load_responses(&self, poll_id: &str) -> AppResult<Vec<String>> {
        let responses = OpinionResponse::find()
            .filter(opinion_response::Column::PollId.eq(poll_id))
            .order_by_asc(opinion_response::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(responses.into_iter().map(|r| r.body).collect())
    }
}

/// Build an opinion response row.
#[must_use]
pub fn opinion_response_model(
    id: String,
    poll_id: &str,
    body: String,
    at: DateTime<Utc>,
) -> opinion_response::ActiveModel {
    opinion_response::ActiveModel {
        id: Set(id),
        poll_id: Set(poll_id.to_string()),
        body: Set(body),
        created_at: Set(at.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_init_slots_empty_is_noop() {
        // No exec results queued: a query would panic the mock.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = VoteRepository::new(db);
        assert!(repo.init_slots("poll1", 0).await.is_ok());
    }

    #[tokio::test]
    async fn test_apply_deltas_skips_zero_entries() {
        // Two non-zero deltas -> exactly two updates.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let result = repo.apply_deltas("poll1", &[1, 0, 2]).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_load_counts_ordered() {
        let slots = vec![
            vote_slot::Model {
                poll_id: "poll1".to_string(),
                slot_index: 0,
                count: 3,
            },
            vote_slot::Model {
                poll_id: "poll1".to_string(),
                slot_index: 1,
                count: 7,
            },
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([slots])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let counts = repo.load_counts("poll1").await.unwrap();

        assert_eq!(counts, vec![3, 7]);
    }

    #[tokio::test]
    async fn test_append_responses_empty_is_noop() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = VoteRepository::new(db);
        assert!(repo.append_responses(Vec::new()).await.is_ok());
    }
}
