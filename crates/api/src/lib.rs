//! HTTP API layer for tallysheet.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: signup, sheets, polls, votes, notifications, admins
//! - **Extractors**: authentication, pagination
//! - **Middleware**: bearer-token resolution into an actor identity
//!
//! Built on Axum 0.8 with Tower middleware stack. Token issuance lives
//! in an external identity service; this layer only verifies tokens and
//! hands the resolved `(actor id, role)` to the core services.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
