//! Vote slot entity: one counter per poll option.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote_slot")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub poll_id: String,

    /// Position in the poll's option list
    #[sea_orm(primary_key, auto_increment = false)]
    pub slot_index: i32,

    /// Accumulated votes for this option
    #[sea_orm(default_value = 0)]
    pub count: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::poll::Entity",
        from = "Column::PollId",
        to = "super::poll::Column::Id",
        on_delete = "Cascade"
    )]
    Poll,
}

impl Related<super::poll::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Poll.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
