//! Bearer-token authentication
//!
//! The transport layer verifies the opaque token and hands the core a
//! trusted user id; handlers never read identity from request bodies.
//! Tokens are issued at registration and stored only as SHA-256
//! digests.

use super::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Verified identity of the requesting user, inserted by
/// [`require_auth`] and extracted by handlers via `Extension`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

/// Middleware guarding all game and user routes. Rejects requests
/// without a resolvable bearer token before any handler runs.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Authorization token required"))?;

    let user_id = state
        .resolver
        .store()
        .user_id_for_token(token)
        .map_err(ApiError::from)?
        .ok_or_else(|| {
            debug!("rejected request with unknown token");
            ApiError::unauthorized("Invalid authorization token")
        })?;

    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}
