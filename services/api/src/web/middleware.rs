//! services/api/src/web/middleware.rs
//!
//! Session middleware for protecting the dashboard routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::sync::Arc;
use string_transformer_core::domain::SessionIdentity;
use tracing::warn;

use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Extracts the session cookie value from a Cookie header, if present.
pub fn session_cookie_value(cookie_header: &str) -> Option<&str> {
    cookie_header.split(';').find_map(|c| {
        let c = c.trim();
        c.strip_prefix("session=")
    })
}

/// Middleware that validates the session cookie and resolves the identity.
///
/// If valid, inserts the `SessionIdentity` into request extensions for
/// handlers to use. If invalid or missing, returns 401 Unauthorized.
/// Admin-only operations additionally call `require_admin` at the top of
/// their handler.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract cookie header
    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Parse session ID from cookie
    let session_id = session_cookie_value(cookie_header).ok_or(StatusCode::UNAUTHORIZED)?;

    // 3. Validate the session in the database, resolve the identity
    let identity = state
        .db
        .validate_auth_session(session_id, Utc::now())
        .await
        .map_err(|e| {
            warn!("Rejected session cookie: {:?}", e);
            StatusCode::UNAUTHORIZED
        })?;

    // 4. Insert the identity into request extensions
    req.extensions_mut().insert(identity);

    // 5. Continue to the handler
    Ok(next.run(req).await)
}

/// Guard for admin-only operations: user management and bulk clears.
///
/// A plain authenticated user gets a visible 403 error, not a redirect.
pub fn require_admin(identity: &SessionIdentity) -> Result<(), (StatusCode, String)> {
    if identity.is_admin {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            "Only administrators can perform this action".to_string(),
        ))
    }
}
