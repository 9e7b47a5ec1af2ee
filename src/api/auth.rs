use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::error::ApiError;
use crate::security::{bearer_token, constant_time_compare};
use crate::state::AppState;

/// Extractor guarding write endpoints with `Authorization: Bearer <API_KEY>`.
///
/// Missing credentials are rejected with 401. A wrong key, or any key while
/// no `API_KEY` is configured, is rejected with 403.
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

#[async_trait]
impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Err(ApiError::Unauthorized);
        };

        match state.config.api_key.as_deref() {
            Some(expected) if constant_time_compare(token, expected) => Ok(RequireApiKey),
            Some(_) => {
                warn!("Rejected write to {}: invalid API key", parts.uri.path());
                Err(ApiError::Forbidden)
            }
            None => {
                warn!("Rejected write to {}: API_KEY is not configured", parts.uri.path());
                Err(ApiError::Forbidden)
            }
        }
    }
}
