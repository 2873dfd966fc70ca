//! Notification entity: a pending moderation action awaiting super-admin
//! resolution.
//!
//! Resolved records are deleted, so a terminal status is only ever
//! observed in flight; the pending queue is what persists at rest.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of subject is awaiting a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A newly registered admin awaiting verification.
    #[sea_orm(string_value = "user_signup")]
    UserSignup,
    /// A sheet submitted for publication.
    #[sea_orm(string_value = "sheet_approval")]
    SheetApproval,
}

/// Notification resolution states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum NotificationStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub kind: NotificationKind,

    /// The entity awaiting the decision (user or sheet id)
    pub subject_id: String,

    /// Signing-up user, or the sheet's owner
    pub user_id: String,

    /// Set for sheet approvals only
    #[sea_orm(nullable)]
    pub sheet_id: Option<String>,

    // Snapshot fields, denormalized at creation so the queue renders
    // even if the subject changes later.
    #[sea_orm(nullable)]
    pub user_name: Option<String>,

    #[sea_orm(nullable)]
    pub user_phone: Option<String>,

    #[sea_orm(nullable)]
    pub user_organization: Option<String>,

    #[sea_orm(nullable)]
    pub sheet_title: Option<String>,

    #[sea_orm(nullable)]
    pub sheet_venue: Option<String>,

    pub status: NotificationStatus,

    /// Super-admin who resolved this notification
    #[sea_orm(nullable)]
    pub resolved_by: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::sheet::Entity",
        from = "Column::SheetId",
        to = "super::sheet::Column::Id"
    )]
    Sheet,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::sheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sheet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
