//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account roles.
///
/// The role is the sole authorization signal for mutating operations;
/// capability checks live in `tallysheet-core` and dispatch on this enum
/// rather than on raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Role {
    /// Freshly signed up, awaiting super-admin review.
    #[sea_orm(string_value = "new")]
    #[default]
    New,
    /// Approved admin who may create and manage own sheets.
    #[sea_orm(string_value = "verified_admin")]
    VerifiedAdmin,
    /// Moderator with full access.
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
    /// Rejected account. Kept for audit; never deleted.
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name
    pub name: String,

    /// Phone number, used as the signup identity
    #[sea_orm(unique)]
    pub phone: String,

    /// Organization the admin registers under
    pub organization: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Account role
    pub role: Role,

    /// Whether a super-admin has verified this account
    #[sea_orm(default_value = false)]
    pub is_verified: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sheet::Entity")]
    Sheets,
}

impl Related<super::sheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sheets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
