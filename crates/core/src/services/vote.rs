//! Vote ledger service.
//!
//! Applies a single respondent submission to a poll's counters or
//! response list. Submissions are anonymous; no actor identity is
//! consumed here.

use serde::Deserialize;
use tallysheet_common::{AppError, AppResult, IdGenerator, validate_id};
use tallysheet_db::repositories::{PollRepository, VoteRepository, opinion_response_model};

/// A respondent submission. Choice and slide polls read `votes`;
/// opinion polls read `opinions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteSubmission {
    /// Vote deltas aligned to option indices.
    #[serde(default)]
    pub votes: Vec<i64>,
    /// Free-text entries.
    #[serde(default)]
    pub opinions: Vec<String>,
}

/// Vote ledger service.
#[derive(Clone)]
pub struct VoteService {
    poll_repo: PollRepository,
    vote_repo: VoteRepository,
    id_gen: IdGenerator,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub const fn new(poll_repo: PollRepository, vote_repo: VoteRepository) -> Self {
        Self {
            poll_repo,
            vote_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Apply one submission to a poll.
    ///
    /// Exactly one `participant_count` increment per accepted
    /// submission, however many options were marked; `updated_at` is
    /// refreshed in the same statement.
    pub async fn submit(&self, poll_id: &str, submission: VoteSubmission) -> AppResult<()> {
        validate_id(poll_id)?;
        let poll = self.poll_repo.get_by_id(poll_id).await?;
        let now = chrono::Utc::now();

        if poll.poll_type.is_opinion() {
            let entries: Vec<String> = submission
                .opinions
                .iter()
                .map(|o| o.trim())
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();

            if entries.is_empty() {
                return Err(AppError::NoOpinionSubmitted);
            }

            let models = entries
                .into_iter()
                .map(|body| opinion_response_model(self.id_gen.generate(), poll_id, body, now))
                .collect();

            self.vote_repo.append_responses(models).await?;
        } else {
            if submission.votes.iter().all(|delta| *delta == 0) {
                return Err(AppError::NoVotesSubmitted);
            }

            let options: Vec<String> = serde_json::from_value(poll.options.clone())
                .map_err(|e| AppError::Internal(format!("invalid poll options: {e}")))?;

            if submission.votes.len() > options.len() {
                return Err(AppError::InvalidArgument(format!(
                    "{} vote entries for {} options",
                    submission.votes.len(),
                    options.len()
                )));
            }

            self.vote_repo.apply_deltas(poll_id, &submission.votes).await?;
        }

        self.poll_repo.record_submission(poll_id, now).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;
    use tallysheet_db::entities::poll::{self, PollType};

    const POLL_ID: &str = "01hzqy4v7s0000000000000003";

    fn create_test_poll(poll_type: PollType, options: &[&str]) -> poll::Model {
        poll::Model {
            id: POLL_ID.to_string(),
            sheet_id: "01hzqy4v7s0000000000000002".to_string(),
            title: "Lunch preference".to_string(),
            description: String::new(),
            options: json!(options),
            categories: json!(["food"]),
            poll_type,
            participant_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> VoteService {
        let db = Arc::new(db);
        VoteService::new(
            PollRepository::new(Arc::clone(&db)),
            VoteRepository::new(db),
        )
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[tokio::test]
    async fn test_malformed_id_rejected_before_lookup() {
        // No mock results queued: any query would fail loudly.
        let service =
            service_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service.submit("not-a-ulid", VoteSubmission::default()).await;

        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_unknown_poll_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<poll::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service.submit(POLL_ID, VoteSubmission::default()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_delta_array_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_poll(PollType::SingleChoice, &["A", "B"])]])
            .into_connection();
        let service = service_with(db);

        let result = service.submit(POLL_ID, VoteSubmission::default()).await;

        assert!(matches!(result, Err(AppError::NoVotesSubmitted)));
    }

    #[tokio::test]
    async fn test_all_zero_delta_array_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_poll(PollType::MultiChoice, &["A", "B"])]])
            .into_connection();
        let service = service_with(db);

        let submission = VoteSubmission {
            votes: vec![0, 0],
            opinions: Vec::new(),
        };
        let result = service.submit(POLL_ID, submission).await;

        assert!(matches!(result, Err(AppError::NoVotesSubmitted)));
    }

    #[tokio::test]
    async fn test_oversized_delta_array_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_poll(PollType::SingleChoice, &["A", "B"])]])
            .into_connection();
        let service = service_with(db);

        let submission = VoteSubmission {
            votes: vec![1, 0, 1],
            opinions: Vec::new(),
        };
        let result = service.submit(POLL_ID, submission).await;

        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_accepted_votes_increment_and_record_submission() {
        // One non-zero delta -> one slot update, then the participant bump.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_poll(PollType::MultiChoice, &["A", "B"])]])
            .append_exec_results([exec_ok(), exec_ok()])
            .into_connection();
        let service = service_with(db);

        let submission = VoteSubmission {
            votes: vec![1, 0],
            opinions: Vec::new(),
        };
        assert!(service.submit(POLL_ID, submission).await.is_ok());
    }

    #[tokio::test]
    async fn test_whitespace_only_opinions_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_poll(PollType::Opinion, &["Thoughts?"])]])
            .into_connection();
        let service = service_with(db);

        let submission = VoteSubmission {
            votes: Vec::new(),
            opinions: vec!["   ".to_string(), String::new()],
        };
        let result = service.submit(POLL_ID, submission).await;

        assert!(matches!(result, Err(AppError::NoOpinionSubmitted)));
    }

    #[tokio::test]
    async fn test_opinion_entries_trimmed_and_appended() {
        // ["a", "  ", "b"] -> one insert of two rows, one participant bump.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_poll(PollType::Opinion, &["Thoughts?"])]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                },
                exec_ok(),
            ])
            .into_connection();
        let service = service_with(db);

        let submission = VoteSubmission {
            votes: Vec::new(),
            opinions: vec!["a".to_string(), "  ".to_string(), "b".to_string()],
        };
        assert!(service.submit(POLL_ID, submission).await.is_ok());
    }
}
