//! Poll repository.

use std::sync::Arc;

use crate::entities::{Poll, poll};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};
use tallysheet_common::{AppError, AppResult, PageQuery};

/// Poll repository for database operations.
#[derive(Clone)]
pub struct PollRepository {
    db: Arc<DatabaseConnection>,
}

impl PollRepository {
    /// Create a new poll repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a poll by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<poll::Model>> {
        Poll::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a poll by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<poll::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("poll not found: {id}")))
    }

    /// Create a new poll.
    pub async fn create(&self, model: poll::ActiveModel) -> AppResult<poll::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a poll.
    pub async fn update(&self, model: poll::ActiveModel) -> AppResult<poll::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List polls belonging to a sheet (paginated, oldest first) with a
    /// total count.
    pub async fn list_by_sheet(
        &self,
        sheet_id: &str,
        page: PageQuery,
    ) -> AppResult<(Vec<poll::Model>, u64)> {
        let query = Poll::find()
            .filter(poll::Column::SheetId.eq(sheet_id))
            .order_by_asc(poll::Column::CreatedAt);

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let polls = query
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((polls, total))
    }

    /// Record one accepted submission: bump `participant_count` and
    /// refresh `updated_at` in a single atomic update.
    pub async fn record_submission(&self, id: &str, at: DateTime<Utc>) -> AppResult<()> {
        Poll::update_many()
            .col_expr(
                poll::Column::ParticipantCount,
                Expr::col(poll::Column::ParticipantCount).add(1),
            )
            .col_expr(poll::Column::UpdatedAt, Expr::value(at))
            .filter(poll::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete one poll. Returns the number of rows removed so callers
    /// can distinguish a missing poll.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<u64> {
        let result = Poll::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Delete every poll under a sheet. Slot and response rows cascade.
    pub async fn delete_by_sheet(&self, sheet_id: &str) -> AppResult<u64> {
        let result = Poll::delete_many()
            .filter(poll::Column::SheetId.eq(sheet_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::poll::PollType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;

    fn create_test_poll(id: &str, sheet_id: &str) -> poll::Model {
        poll::Model {
            id: id.to_string(),
            sheet_id: sheet_id.to_string(),
            title: "Lunch preference".to_string(),
            description: String::new(),
            options: json!(["Pizza", "Sushi"]),
            categories: json!(["food"]),
            poll_type: PollType::SingleChoice,
            participant_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<poll::Model>::new()])
                .into_connection(),
        );

        let repo = PollRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_by_id_reports_rows_affected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = PollRepository::new(db);
        let removed = repo.delete_by_id("nonexistent").await.unwrap();

        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn test_record_submission_single_statement() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = PollRepository::new(db);
        assert!(repo.record_submission("poll1", Utc::now()).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_by_sheet_returns_total() {
        let poll = create_test_poll("poll1", "sheet1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // count query result, then page query result
                .append_query_results([vec![count_row(1)]])
                .append_query_results([[poll.clone()]])
                .into_connection(),
        );

        let repo = PollRepository::new(db);
        let (polls, total) = repo
            .list_by_sheet("sheet1", PageQuery::default())
            .await
            .unwrap();

        assert_eq!(total, 1);
        assert_eq!(polls.len(), 1);
        assert_eq!(polls[0].sheet_id, "sheet1");
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<String, sea_orm::Value> {
        let mut row = std::collections::BTreeMap::new();
        row.insert("num_items".to_string(), sea_orm::Value::BigInt(Some(n)));
        row
    }
}
