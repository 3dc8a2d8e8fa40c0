//! Reject requests that do not carry the configured API key.

use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use subtle::ConstantTimeEq;

/// Header the key is read from.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Extractor that succeeds only when `X-API-Key` matches the configured key.
#[derive(Clone, Copy, Debug)]
pub struct RequireApiKey;

#[async_trait]
impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .unwrap_or("");
        if presented.is_empty() || !keys_match(presented.as_bytes(), state.api_key.as_bytes()) {
            tracing::warn!(path = %parts.uri.path(), "rejected request with invalid api key");
            return Err(AppError::Unauthorized("Invalid or missing API key".into()));
        }
        Ok(RequireApiKey)
    }
}

fn keys_match(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
