//! Acting user extractor.
//!
//! The upstream gateway authenticates the caller and forwards the user id in
//! `X-User-Id`. Whether that user exists and is active is decided by the
//! domain services.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// The user on whose behalf the request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("Missing X-User-Id header".to_string()))?;

        let user_id = raw
            .to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .ok_or_else(|| ApiError::Unauthorized("Invalid X-User-Id header".to_string()))?;

        Ok(Self { user_id })
    }
}
