//! Sheet entity. A sheet is an event/survey container holding polls.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sheet lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum SheetStatus {
    /// Awaiting super-admin approval.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved and open for voting.
    #[sea_orm(string_value = "published")]
    Published,
    /// Approval denied.
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Closed by the owner or a super-admin.
    #[sea_orm(string_value = "finished")]
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sheet")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The admin who owns this sheet
    pub owner_id: String,

    pub title: String,

    pub venue: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub status: SheetStatus,

    /// Actor who moved the sheet out of `pending` (or finished it)
    #[sea_orm(nullable)]
    pub approved_by: Option<String>,

    #[sea_orm(nullable)]
    pub approved_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,

    #[sea_orm(has_many = "super::poll::Entity")]
    Polls,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::poll::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Polls.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
