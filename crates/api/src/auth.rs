use axum::{extract::FromRequestParts, http::request::Parts};
use learnify_core::model::UserId;

use crate::error::ApiError;

/// Header carrying the learner id resolved by the upstream auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated learner making the request.
///
/// Handlers scope every query to this id; clients cannot choose another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let id = raw.parse::<UserId>().map_err(|_| ApiError::Unauthorized)?;
        Ok(Self { id })
    }
}
