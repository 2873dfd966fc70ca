//! User repository.

use std::sync::Arc;

use crate::entities::{User, user, user::Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};
use tallysheet_common::{AppError, AppResult, PageQuery};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user not found: {id}")))
    }

    /// Find a user by phone number.
    pub async fn find_by_phone(&self, phone: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Phone.eq(phone))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List users (paginated, newest first) with a total count.
    pub async fn list(&self, page: PageQuery) -> AppResult<(Vec<user::Model>, u64)> {
        let query = User::find().order_by_desc(user::Column::CreatedAt);

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let users = query
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((users, total))
    }

    /// Set a user's role and verification flag.
    ///
    /// A plain field-set (not an increment), so re-applying the same
    /// transition is an idempotent no-op; notification resolution relies
    /// on this for its retry contract.
    pub async fn set_role(&self, id: &str, role: Role, is_verified: bool) -> AppResult<()> {
        User::update_many()
            .col_expr(user::Column::Role, Expr::value(role))
            .col_expr(user::Column::IsVerified, Expr::value(is_verified))
            .col_expr(
                user::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
