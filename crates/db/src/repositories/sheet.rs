//! Sheet repository.

use std::sync::Arc;

use crate::entities::{Sheet, sheet, sheet::SheetStatus};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};
use tallysheet_common::{AppError, AppResult, PageQuery};

/// Sheet repository for database operations.
#[derive(Clone)]
pub struct SheetRepository {
    db: Arc<DatabaseConnection>,
}

impl SheetRepository {
    /// Create a new sheet repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a sheet by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<sheet::Model>> {
        Sheet::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a sheet by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<sheet::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("sheet not found: {id}")))
    }

    /// Create a new sheet.
    pub async fn create(&self, model: sheet::ActiveModel) -> AppResult<sheet::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all sheets (paginated, newest first) with a total count.
    pub async fn list_all(&self, page: PageQuery) -> AppResult<(Vec<sheet::Model>, u64)> {
        let query = Sheet::find().order_by_desc(sheet::Column::CreatedAt);

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let sheets = query
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((sheets, total))
    }

    /// List sheets owned by one admin (paginated, newest first) with a
    /// total count.
    pub async fn list_by_owner(
        &self,
        owner_id: &str,
        page: PageQuery,
    ) -> AppResult<(Vec<sheet::Model>, u64)> {
        let query = Sheet::find()
            .filter(sheet::Column::OwnerId.eq(owner_id))
            .order_by_desc(sheet::Column::CreatedAt);

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let sheets = query
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((sheets, total))
    }

    /// Set a sheet's status, stamping the resolving actor and time.
    ///
    /// A plain field-set; re-applying the same transition is an
    /// idempotent no-op, which notification resolution relies on.
    pub async fn update_status(
        &self,
        id: &str,
        status: SheetStatus,
        resolved_by: &str,
        resolved_at: DateTime<Utc>,
    ) -> AppResult<()> {
        Sheet::update_many()
            .col_expr(sheet::Column::Status, Expr::value(status))
            .col_expr(sheet::Column::ApprovedBy, Expr::value(resolved_by))
            .col_expr(sheet::Column::ApprovedAt, Expr::value(resolved_at))
            .col_expr(sheet::Column::UpdatedAt, Expr::value(resolved_at))
            .filter(sheet::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a sheet.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Sheet::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
