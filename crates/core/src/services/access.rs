//! Role capabilities.
//!
//! Every privileged operation receives a resolved [`Actor`] from the
//! HTTP layer and checks it here, against a closed capability matrix,
//! instead of comparing role strings at call sites.

use tallysheet_db::entities::user::Role;

/// A resolved actor identity: user id plus role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// User id from the verified token.
    pub id: String,
    /// Role at token-verification time.
    pub role: Role,
}

impl Actor {
    /// Build an actor.
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// Privileged actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a sheet (and its bundled polls).
    CreateSheet,
    /// List every sheet regardless of owner.
    ListAllSheets,
    /// List own sheets.
    ListOwnSheets,
    /// Create, edit, or delete polls on an owned sheet.
    ManagePolls,
    /// View and resolve the pending approval queue.
    ResolveApprovals,
    /// List admin accounts and override their verification.
    ManageAdmins,
}

/// Whether `role` may perform `action`.
#[must_use]
pub const fn can_perform(role: Role, action: Action) -> bool {
    match action {
        Action::CreateSheet | Action::ListOwnSheets | Action::ManagePolls => {
            matches!(role, Role::VerifiedAdmin | Role::SuperAdmin)
        }
        Action::ListAllSheets | Action::ResolveApprovals | Action::ManageAdmins => {
            matches!(role, Role::SuperAdmin)
        }
    }
}
