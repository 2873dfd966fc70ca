//! Notification repository.

use std::sync::Arc;

use crate::entities::{
    Notification, notification,
    notification::NotificationStatus,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};
use tallysheet_common::{AppError, AppResult, PageQuery};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a notification by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<notification::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("notification not found: {id}")))
    }

    /// Create a new notification.
    pub async fn create(&self, model: notification::ActiveModel) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List pending notifications (paginated, oldest first) with a total
    /// count.
    pub async fn list_pending(
        &self,
        page: PageQuery,
    ) -> AppResult<(Vec<notification::Model>, u64)> {
        let query = Notification::find()
            .filter(notification::Column::Status.eq(NotificationStatus::Pending))
            .order_by_asc(notification::Column::CreatedAt);

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let notifications = query
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((notifications, total))
    }

    /// Move a pending notification to a terminal status.
    ///
    /// The update is conditional on the persisted status still being
    /// `pending`; returns `false` when another resolver won the race.
    pub async fn claim_resolution(
        &self,
        id: &str,
        status: NotificationStatus,
        resolved_by: &str,
        resolved_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = Notification::update_many()
            .col_expr(notification::Column::Status, Expr::value(status))
            .col_expr(notification::Column::ResolvedBy, Expr::value(resolved_by))
            .col_expr(notification::Column::UpdatedAt, Expr::value(resolved_at))
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::Status.eq(NotificationStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Delete a notification.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Notification::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::notification::NotificationKind;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_notification(id: &str, status: NotificationStatus) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            kind: NotificationKind::UserSignup,
            subject_id: "user1".to_string(),
            user_id: "user1".to_string(),
            sheet_id: None,
            user_name: Some("Test Admin".to_string()),
            user_phone: Some("5551234".to_string()),
            user_organization: Some("Test Org".to_string()),
            sheet_title: None,
            sheet_venue: None,
            status,
            resolved_by: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<notification::Model>::new()])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_claim_resolution_wins_when_pending() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let claimed = repo
            .claim_resolution("n1", NotificationStatus::Approved, "admin1", Utc::now())
            .await
            .unwrap();

        assert!(claimed);
    }

    #[tokio::test]
    async fn test_claim_resolution_loses_race_on_zero_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let claimed = repo
            .claim_resolution("n1", NotificationStatus::Rejected, "admin1", Utc::now())
            .await
            .unwrap();

        assert!(!claimed);
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let n = create_test_notification("n1", NotificationStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[n.clone()]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.find_by_id("n1").await.unwrap();

        assert_eq!(result.unwrap().status, NotificationStatus::Pending);
    }
}
