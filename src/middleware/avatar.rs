//! Calling-avatar extraction
//!
//! Authentication itself happens upstream; by the time a request reaches the
//! gateway the acting avatar is identified by the `X-Avatar-Id` header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

pub const AVATAR_ID_HEADER: &str = "x-avatar-id";

/// Avatar on whose behalf the request is made
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(AvatarId(avatar_id): AvatarId) -> String {
///     avatar_id.to_string()
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AvatarId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(AVATAR_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ApiError::Validation(
                    "AvatarId is required. Please authenticate or provide X-Avatar-Id header."
                        .to_string(),
                )
            })?;

        let avatar_id = Uuid::parse_str(raw)
            .map_err(|_| ApiError::Validation(format!("Invalid X-Avatar-Id header: '{}'", raw)))?;

        if avatar_id.is_nil() {
            return Err(ApiError::Validation(
                "AvatarId is required. Please authenticate or provide X-Avatar-Id header."
                    .to_string(),
            ));
        }

        Ok(AvatarId(avatar_id))
    }
}
