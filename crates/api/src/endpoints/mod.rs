//! API endpoints.

mod admins;
mod notifications;
mod polls;
mod sheets;
mod signup;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(signup::router())
        .nest("/sheets", sheets::router())
        .nest("/polls", polls::router())
        .nest("/notifications", notifications::router())
        .nest("/admins", admins::router())
}
