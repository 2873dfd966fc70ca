//! Poll catalog service.
//!
//! All shape validation happens in [`PollDraft::validate`]; the create
//! and edit paths trust a draft. Sheet creation and the admin endpoints
//! both go through the same seam.

use serde::Deserialize;
use tallysheet_common::{AppError, AppResult, IdGenerator, PageQuery, validate_id};
use tallysheet_db::{
    entities::{poll, poll::PollType},
    repositories::{PollRepository, VoteRepository},
};
use sea_orm::Set;
use serde_json::json;

/// Raw poll payload as bound by the HTTP layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollInput {
    /// Poll title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Option labels.
    #[serde(default)]
    pub options: Vec<String>,
    /// Poll type name; blank defaults to `single_choice`.
    #[serde(default)]
    pub poll_type: String,
    /// Category tags.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A validated poll payload, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    /// Trimmed title.
    pub title: String,
    /// Trimmed description.
    pub description: String,
    /// Trimmed, non-empty option labels.
    pub options: Vec<String>,
    /// Parsed poll type.
    pub poll_type: PollType,
    /// Normalized categories.
    pub categories: Vec<String>,
}

impl PollDraft {
    /// Validate a raw payload into a draft.
    pub fn validate(input: PollInput) -> AppResult<Self> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("poll title is required".to_string()));
        }

        let poll_type = PollType::parse(&input.poll_type).map_err(AppError::Validation)?;

        let options: Vec<String> = input
            .options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        let min = poll_type.min_options();
        if options.len() < min {
            let plural = if min > 1 { "s" } else { "" };
            return Err(AppError::Validation(format!(
                "poll requires at least {min} option{plural}"
            )));
        }

        let categories = normalize_categories(&input.categories);
        if categories.is_empty() {
            return Err(AppError::Validation(
                "at least one category is required".to_string(),
            ));
        }

        Ok(Self {
            title,
            description: input.description.trim().to_string(),
            options,
            poll_type,
            categories,
        })
    }
}

/// Trim entries, drop empties, and deduplicate case-insensitively,
/// keeping first occurrence order.
#[must_use]
pub fn normalize_categories(values: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut categories = Vec::with_capacity(values.len());

    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }

        if seen.insert(trimmed.to_lowercase()) {
            categories.push(trimmed.to_string());
        }
    }

    categories
}

/// A poll row with its assembled counters or responses.
#[derive(Debug, Clone)]
pub struct PollRecord {
    /// The poll row.
    pub poll: poll::Model,
    /// Per-option counters; empty for opinion polls.
    pub votes: Vec<i64>,
    /// Free-text responses; empty for non-opinion polls.
    pub responses: Vec<String>,
}

/// Poll catalog service.
#[derive(Clone)]
pub struct PollService {
    poll_repo: PollRepository,
    vote_repo: VoteRepository,
    id_gen: IdGenerator,
}

impl PollService {
    /// Create a new poll service.
    #[must_use]
    pub const fn new(poll_repo: PollRepository, vote_repo: VoteRepository) -> Self {
        Self {
            poll_repo,
            vote_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a poll under a sheet from a validated draft.
    ///
    /// Slot allocation failure rolls the poll row back so no poll is
    /// left without its counters.
    pub async fn create(&self, sheet_id: &str, draft: PollDraft) -> AppResult<PollRecord> {
        let now = chrono::Utc::now();
        let id = self.id_gen.generate();
        let slot_count = draft.poll_type.vote_slots(draft.options.len());

        let model = poll::ActiveModel {
            id: Set(id),
            sheet_id: Set(sheet_id.to_string()),
            title: Set(draft.title),
            description: Set(draft.description),
            options: Set(json!(draft.options)),
            categories: Set(json!(draft.categories)),
            poll_type: Set(draft.poll_type),
            participant_count: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let created = self.poll_repo.create(model).await?;

        if let Err(e) = self.vote_repo.init_slots(&created.id, slot_count).await {
            let _ = self.poll_repo.delete_by_id(&created.id).await;
            return Err(e);
        }

        Ok(PollRecord {
            votes: vec![0; slot_count],
            responses: Vec::new(),
            poll: created,
        })
    }

    /// Edit a poll from a validated draft.
    ///
    /// The poll type and owning sheet are immutable; option edits resize
    /// the counter set so it always matches the option list.
    pub async fn edit(&self, id: &str, draft: PollDraft) -> AppResult<PollRecord> {
        validate_id(id)?;
        let existing = self.poll_repo.get_by_id(id).await?;

        if draft.poll_type != existing.poll_type {
            return Err(AppError::Validation(
                "poll type cannot be changed".to_string(),
            ));
        }

        let slot_count = draft.poll_type.vote_slots(draft.options.len());

        let mut active: poll::ActiveModel = existing.into();
        active.title = Set(draft.title);
        active.description = Set(draft.description);
        active.options = Set(json!(draft.options));
        active.categories = Set(json!(draft.categories));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.poll_repo.update(active).await?;

        if !draft.poll_type.is_opinion() {
            self.vote_repo.resize_slots(&updated.id, slot_count).await?;
        }

        self.assemble(updated).await
    }

    /// Get a poll with its counters or responses.
    pub async fn get(&self, id: &str) -> AppResult<PollRecord> {
        validate_id(id)?;
        let poll = self.poll_repo.get_by_id(id).await?;
        self.assemble(poll).await
    }

    /// List a sheet's polls with their counters or responses.
    pub async fn list_by_sheet(
        &self,
        sheet_id: &str,
        page: PageQuery,
    ) -> AppResult<(Vec<PollRecord>, u64)> {
        let (polls, total) = self.poll_repo.list_by_sheet(sheet_id, page).await?;

        let mut records = Vec::with_capacity(polls.len());
        for poll in polls {
            records.push(self.assemble(poll).await?);
        }

        Ok((records, total))
    }

    /// Delete one poll by its id.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<()> {
        validate_id(id)?;
        let removed = self.poll_repo.delete_by_id(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("poll not found: {id}")));
        }
        Ok(())
    }

    /// Delete every poll under a sheet.
    pub async fn delete_by_sheet(&self, sheet_id: &str) -> AppResult<u64> {
        validate_id(sheet_id)?;
        self.poll_repo.delete_by_sheet(sheet_id).await
    }

    async fn assemble(&self, poll: poll::Model) -> AppResult<PollRecord> {
        let (votes, responses) = if poll.poll_type.is_opinion() {
            (Vec::new(), self.vote_repo.load_responses(&poll.id).await?)
        } else {
            (self.vote_repo.load_counts(&poll.id).await?, Vec::new())
        };

        Ok(PollRecord {
            poll,
            votes,
            responses,
        })
    }
}
