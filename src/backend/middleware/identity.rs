/**
 * Caller Identity
 *
 * Authentication happens upstream of this service. The gateway forwards the
 * authenticated user id in the `x-user-id` header and handlers receive it
 * through the `Caller` extractor. A missing or malformed header is rejected
 * with 401 before the handler runs.
 */

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::backend::error::BackendError;
use crate::shared::itinerary::UserId;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a request acts on behalf of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| {
                tracing::warn!("[Identity] {} header missing", USER_ID_HEADER);
                BackendError::unauthorized("missing caller identity")
            })?;

        let user = raw
            .to_str()
            .ok()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                tracing::warn!("[Identity] malformed {} header", USER_ID_HEADER);
                BackendError::unauthorized("malformed caller identity")
            })?;

        Ok(Caller(UserId(user)))
    }
}
