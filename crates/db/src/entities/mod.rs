//! Database entities.

pub mod notification;
pub mod opinion_response;
pub mod poll;
pub mod sheet;
pub mod user;
pub mod vote_slot;

pub use notification::Entity as Notification;
pub use opinion_response::Entity as OpinionResponse;
pub use poll::Entity as Poll;
pub use sheet::Entity as Sheet;
pub use user::Entity as User;
pub use vote_slot::Entity as VoteSlot;
