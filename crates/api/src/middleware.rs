//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tallysheet_core::{
    Actor, ApprovalService, PollService, SheetService, UserService, VoteService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub sheet_service: SheetService,
    pub poll_service: PollService,
    pub vote_service: VoteService,
    pub approval_service: ApprovalService,
    pub token_key: TokenKey,
}

/// Verification key for bearer tokens issued by the external identity
/// service.
#[derive(Clone)]
pub struct TokenKey {
    key: DecodingKey,
}

impl TokenKey {
    /// Build a verification key from the shared HS256 secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Decode a token into its subject (user id), if valid.
    #[must_use]
    pub fn subject(&self, token: &str) -> Option<String> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(token, &self.key, &validation)
            .ok()
            .map(|data| data.claims.sub)
    }
}

/// Token claims. Only the subject is trusted; the role is re-read from
/// the user record so revocations take effect immediately.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` into an [`Actor`] in request
/// extensions. Requests without a valid token pass through anonymously;
/// handlers requiring identity reject them at extraction time.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Some(user_id) = state.token_key.subject(token)
        && let Ok(user) = state.user_service.get_by_id(&user_id).await
    {
        req.extensions_mut().insert(Actor::new(user.id, user.role));
    }

    next.run(req).await
}
