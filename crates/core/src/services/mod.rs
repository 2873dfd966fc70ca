//! Business logic services.

#![allow(missing_docs)]

pub mod access;
pub mod approval;
pub mod poll;
pub mod sheet;
pub mod user;
pub mod vote;

pub use access::{Action, Actor, can_perform};
pub use approval::{ApprovalService, Decision};
pub use poll::{PollDraft, PollInput, PollRecord, PollService, normalize_categories};
pub use sheet::{CreateSheetInput, SheetListItem, SheetService};
pub use user::{RegisterInput, UserService, hash_password, verify_password};
pub use vote::{VoteService, VoteSubmission};
