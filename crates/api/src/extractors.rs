//! Request extractors.

use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};
use serde::Deserialize;
use tallysheet_common::PageQuery;
use tallysheet_core::Actor;

/// Authenticated actor extractor.
///
/// The auth middleware resolves the bearer token into an [`Actor`] and
/// stores it in request extensions; handlers that require identity pull
/// it out here.
#[derive(Debug, Clone)]
pub struct AuthActor(pub Actor);

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(AuthActor)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Raw paging parameters as they appear on the query string.
#[derive(Debug, Default, Deserialize)]
struct PageParams {
    page: Option<u64>,
    page_size: Option<u64>,
}

/// Normalized pagination extractor.
///
/// Defaults page to 1 and page size to 20, capped at 100; no handler
/// ever sees the raw values.
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub PageQuery);

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "invalid pagination parameters"))?;

        Ok(Self(PageQuery::new(params.page, params.page_size)))
    }
}
