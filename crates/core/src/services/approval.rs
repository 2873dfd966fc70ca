//! Approval queue service.
//!
//! Records pending moderation actions (new-admin signup, sheet-publish
//! request), resolves each exactly once, and cascades the resolution
//! into the subject entity.
//!
//! Resolution is a two-phase operation across two tables with no
//! surrounding transaction. The retry contract: the subject mutation is
//! an idempotent field-set, so a failure after it leaves the
//! notification `pending` and a retry re-applies the same values. The
//! conditional status flip is what guarantees exactly one resolver wins.

use serde::Deserialize;
use tallysheet_common::{AppError, AppResult, IdGenerator, PageQuery, validate_id};
use tallysheet_db::{
    entities::{
        notification,
        notification::{NotificationKind, NotificationStatus},
        sheet,
        sheet::SheetStatus,
        user,
        user::Role,
    },
    repositories::{NotificationRepository, SheetRepository, UserRepository},
};
use sea_orm::Set;

use super::access::{Action, Actor, can_perform};

/// A super-admin's decision on a pending notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Approve the subject.
    Approve,
    /// Reject the subject.
    Reject,
}

/// Approval queue service.
#[derive(Clone)]
pub struct ApprovalService {
    notification_repo: NotificationRepository,
    user_repo: UserRepository,
    sheet_repo: SheetRepository,
    id_gen: IdGenerator,
}

impl ApprovalService {
    /// Create a new approval service.
    #[must_use]
    pub const fn new(
        notification_repo: NotificationRepository,
        user_repo: UserRepository,
        sheet_repo: SheetRepository,
    ) -> Self {
        Self {
            notification_repo,
            user_repo,
            sheet_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Enqueue a pending notification for a fresh signup.
    pub async fn enqueue_user_signup(
        &self,
        user: &user::Model,
    ) -> AppResult<notification::Model> {
        let now = chrono::Utc::now();

        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            kind: Set(NotificationKind::UserSignup),
            subject_id: Set(user.id.clone()),
            user_id: Set(user.id.clone()),
            sheet_id: Set(None),
            user_name: Set(Some(user.name.clone())),
            user_phone: Set(Some(user.phone.clone())),
            user_organization: Set(Some(user.organization.clone())),
            sheet_title: Set(None),
            sheet_venue: Set(None),
            status: Set(NotificationStatus::Pending),
            resolved_by: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.notification_repo.create(model).await
    }

    /// Enqueue a pending notification for a sheet-publish request.
    pub async fn enqueue_sheet(&self, sheet: &sheet::Model) -> AppResult<notification::Model> {
        let now = chrono::Utc::now();

        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            kind: Set(NotificationKind::SheetApproval),
            subject_id: Set(sheet.id.clone()),
            user_id: Set(sheet.owner_id.clone()),
            sheet_id: Set(Some(sheet.id.clone())),
            user_name: Set(None),
            user_phone: Set(None),
            user_organization: Set(None),
            sheet_title: Set(Some(sheet.title.clone())),
            sheet_venue: Set(Some(sheet.venue.clone())),
            status: Set(NotificationStatus::Pending),
            resolved_by: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.notification_repo.create(model).await
    }

    /// List pending notifications with a total count. Super-admin only.
    pub async fn list_pending(
        &self,
        actor: &Actor,
        page: PageQuery,
    ) -> AppResult<(Vec<notification::Model>, u64)> {
        if !can_perform(actor.role, Action::ResolveApprovals) {
            return Err(AppError::Unauthorized);
        }

        self.notification_repo.list_pending(page).await
    }

    /// Resolve a pending notification and cascade into its subject.
    ///
    /// A resolved record is deleted, so a second resolver observes
    /// either `AlreadyResolved` (race lost on the conditional flip) or
    /// `NotFound` (record already gone).
    pub async fn resolve(
        &self,
        actor: &Actor,
        notification_id: &str,
        decision: Decision,
    ) -> AppResult<notification::Model> {
        if !can_perform(actor.role, Action::ResolveApprovals) {
            return Err(AppError::Unauthorized);
        }

        validate_id(notification_id)?;
        let mut notification = self.notification_repo.get_by_id(notification_id).await?;

        if notification.status != NotificationStatus::Pending {
            return Err(AppError::AlreadyResolved(notification_id.to_string()));
        }

        let resolved_at = chrono::Utc::now();
        let status = match decision {
            Decision::Approve => NotificationStatus::Approved,
            Decision::Reject => NotificationStatus::Rejected,
        };

        // Phase one: mutate the subject. Idempotent, safe to re-apply on
        // a retried resolution.
        match notification.kind {
            NotificationKind::UserSignup => {
                let (role, verified) = match decision {
                    Decision::Approve => (Role::VerifiedAdmin, true),
                    Decision::Reject => (Role::Canceled, false),
                };
                self.user_repo
                    .set_role(&notification.user_id, role, verified)
                    .await?;
            }
            NotificationKind::SheetApproval => {
                let sheet_id = notification.sheet_id.as_deref().ok_or_else(|| {
                    AppError::MissingSubject(notification_id.to_string())
                })?;
                let sheet_status = match decision {
                    Decision::Approve => SheetStatus::Published,
                    Decision::Reject => SheetStatus::Rejected,
                };
                self.sheet_repo
                    .update_status(sheet_id, sheet_status, &actor.id, resolved_at)
                    .await?;
            }
        }

        // Phase two: claim the notification. The update is conditional
        // on the persisted status still being pending, closing the race
        // between two simultaneous resolvers.
        let claimed = self
            .notification_repo
            .claim_resolution(notification_id, status, &actor.id, resolved_at)
            .await?;
        if !claimed {
            return Err(AppError::AlreadyResolved(notification_id.to_string()));
        }

        self.notification_repo.delete(notification_id).await?;

        tracing::info!(
            notification_id,
            kind = ?notification.kind,
            ?decision,
            resolved_by = %actor.id,
            "notification resolved"
        );

        notification.status = status;
        notification.resolved_by = Some(actor.id.clone());
        notification.updated_at = resolved_at.into();

        Ok(notification)
    }
}
