//! Sheet lifecycle service.

use serde::{Deserialize, Serialize};
use tallysheet_common::{AppError, AppResult, IdGenerator, PageQuery, validate_id};
use tallysheet_db::{
    entities::{sheet, sheet::SheetStatus, user::Role},
    repositories::{SheetRepository, UserRepository},
};
use sea_orm::Set;

use super::access::{Action, Actor, can_perform};
use super::poll::{PollDraft, PollInput, PollRecord, PollService};
use super::approval::ApprovalService;

/// Payload for creating a sheet, optionally bundling poll definitions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSheetInput {
    /// Sheet title.
    pub title: String,
    /// Event venue.
    pub venue: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Polls to create with the sheet.
    #[serde(default)]
    pub polls: Vec<PollInput>,
}

/// A sheet listing row, enriched with the owner's display name.
#[derive(Debug, Clone, Serialize)]
pub struct SheetListItem {
    /// Sheet id.
    pub id: String,
    /// Sheet title.
    pub title: String,
    /// Event venue.
    pub venue: String,
    /// Lifecycle status.
    pub status: SheetStatus,
    /// Owner display name; absent when the owner no longer resolves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    /// Last mutation time (creation time when never updated).
    pub updated_at: chrono::DateTime<chrono::FixedOffset>,
}

/// Sheet lifecycle service.
#[derive(Clone)]
pub struct SheetService {
    sheet_repo: SheetRepository,
    user_repo: UserRepository,
    poll_service: PollService,
    approval: ApprovalService,
    id_gen: IdGenerator,
}

impl SheetService {
    /// Create a new sheet service.
    #[must_use]
    pub const fn new(
        sheet_repo: SheetRepository,
        user_repo: UserRepository,
        poll_service: PollService,
        approval: ApprovalService,
    ) -> Self {
        Self {
            sheet_repo,
            user_repo,
            poll_service,
            approval,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a sheet, with any bundled polls, as one all-or-nothing
    /// request.
    ///
    /// Every poll payload is validated before the first write, so a
    /// malformed poll fails the request with nothing persisted. A write
    /// failure partway deletes the polls created so far and the sheet
    /// itself; partially-created sheets are not tolerated.
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateSheetInput,
    ) -> AppResult<(sheet::Model, Vec<PollRecord>)> {
        if !can_perform(actor.role, Action::CreateSheet) {
            return Err(AppError::Unauthorized);
        }

        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }

        let venue = input.venue.trim().to_string();
        if venue.is_empty() {
            return Err(AppError::Validation("venue is required".to_string()));
        }

        let mut drafts: Vec<PollDraft> = Vec::with_capacity(input.polls.len());
        for (index, poll_input) in input.polls.into_iter().enumerate() {
            let draft = PollDraft::validate(poll_input).map_err(|e| {
                AppError::Validation(format!("poll {}: {e}", index + 1))
            })?;
            drafts.push(draft);
        }

        let now = chrono::Utc::now();
        let self_approved = actor.role == Role::SuperAdmin;
        let status = if self_approved {
            SheetStatus::Published
        } else {
            SheetStatus::Pending
        };

        let model = sheet::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(actor.id.clone()),
            title: Set(title),
            venue: Set(venue),
            description: Set(input.description.trim().to_string()),
            status: Set(status),
            approved_by: Set(self_approved.then(|| actor.id.clone())),
            approved_at: Set(self_approved.then(|| now.into())),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let created = self.sheet_repo.create(model).await?;

        let mut records: Vec<PollRecord> = Vec::with_capacity(drafts.len());
        for draft in drafts {
            match self.poll_service.create(&created.id, draft).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    for record in &records {
                        let _ = self.poll_service.delete_by_id(&record.poll.id).await;
                    }
                    let _ = self.sheet_repo.delete(&created.id).await;
                    return Err(e);
                }
            }
        }

        if status == SheetStatus::Pending {
            self.approval.enqueue_sheet(&created).await?;
        }

        Ok((created, records))
    }

    /// List sheets visible to the actor, enriched with owner names.
    ///
    /// A row whose owner no longer resolves keeps its place in the page
    /// with the name omitted; this is a documented degradation, not a
    /// failure.
    pub async fn list(
        &self,
        actor: &Actor,
        page: PageQuery,
    ) -> AppResult<(Vec<SheetListItem>, u64)> {
        let (sheets, total) = if can_perform(actor.role, Action::ListAllSheets) {
            self.sheet_repo.list_all(page).await?
        } else if can_perform(actor.role, Action::ListOwnSheets) {
            self.sheet_repo.list_by_owner(&actor.id, page).await?
        } else {
            return Err(AppError::Unauthorized);
        };

        let mut owner_names = std::collections::HashMap::new();
        for sheet in &sheets {
            if owner_names.contains_key(&sheet.owner_id) {
                continue;
            }
            if let Some(owner) = self.user_repo.find_by_id(&sheet.owner_id).await? {
                owner_names.insert(sheet.owner_id.clone(), owner.name);
            }
        }

        let items = sheets
            .into_iter()
            .map(|sheet| SheetListItem {
                owner_name: owner_names.get(&sheet.owner_id).cloned(),
                updated_at: sheet.updated_at.unwrap_or(sheet.created_at),
                id: sheet.id,
                title: sheet.title,
                venue: sheet.venue,
                status: sheet.status,
            })
            .collect();

        Ok((items, total))
    }

    /// Get a sheet, enforcing owner-or-super-admin access.
    pub async fn get_by_id(&self, actor: &Actor, id: &str) -> AppResult<sheet::Model> {
        validate_id(id)?;
        let sheet = self.sheet_repo.get_by_id(id).await?;
        Self::authorize(actor, &sheet)?;
        Ok(sheet)
    }

    /// Delete a sheet and every poll under it.
    pub async fn delete(&self, actor: &Actor, id: &str) -> AppResult<()> {
        validate_id(id)?;
        let sheet = self.sheet_repo.get_by_id(id).await?;
        Self::authorize(actor, &sheet)?;

        self.poll_service.delete_by_sheet(id).await?;
        self.sheet_repo.delete(id).await
    }

    /// Mark a sheet finished. Finishing an already-finished sheet is an
    /// idempotent success that leaves all timestamps untouched.
    pub async fn finish(&self, actor: &Actor, id: &str) -> AppResult<sheet::Model> {
        validate_id(id)?;
        let sheet = self.sheet_repo.get_by_id(id).await?;
        Self::authorize(actor, &sheet)?;

        if sheet.status == SheetStatus::Finished {
            return Ok(sheet);
        }

        let finished_at = chrono::Utc::now();
        self.sheet_repo
            .update_status(id, SheetStatus::Finished, &actor.id, finished_at)
            .await?;

        self.sheet_repo.get_by_id(id).await
    }

    fn authorize(actor: &Actor, sheet: &sheet::Model) -> AppResult<()> {
        if actor.role == Role::SuperAdmin || sheet.owner_id == actor.id {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }
}
