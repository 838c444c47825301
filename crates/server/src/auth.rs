//! API key authentication middleware.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;

/// Header carrying the shared API key secret.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Middleware guarding mutating routes.
///
/// A missing header and a mismatched key are distinct 403s so clients can
/// tell configuration mistakes from typos. Read-only routes are not behind
/// this middleware and ignore the header entirely.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = state
        .config
        .auth
        .api_key
        .as_deref()
        .ok_or_else(|| ApiError::Internal("no API key configured".to_string()))?;

    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        None => Err(ApiError::MissingApiKey),
        Some(key) if keys_match(key, expected) => Ok(next.run(req).await),
        Some(_) => Err(ApiError::InvalidApiKey),
    }
}

/// Exact string equality, constant-time over the key bytes.
fn keys_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
