//! Repository layer: narrow, per-entity database access.

mod notification;
mod poll;
mod sheet;
mod user;
mod vote;

pub use notification::NotificationRepository;
pub use poll::PollRepository;
pub use sheet::SheetRepository;
pub use user::UserRepository;
pub use vote::{VoteRepository, opinion_response_model};
