//! Route handlers.
//!
//! Protected handlers follow the same order: verify the session, validate
//! input, call the store, emit an audit event, respond. The first failing
//! step produces the response.

pub mod auth;
pub mod health;
pub mod vendors;

use axum::{body::Bytes, http::HeaderMap};
use serde_json::Value;

use crate::auth::{cookie::session_token, Session};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::AuditEvent;

/// Verify the request's session cookie, auditing the rejection.
pub(crate) fn require_session(
    state: &AppState,
    headers: &HeaderMap,
    action: &'static str,
    target: &'static str,
    mut details: Value,
) -> Result<Session, ApiError> {
    let token = session_token(headers);
    state.sessions.verify(token.as_deref()).ok_or_else(|| {
        details["reason"] = Value::from("unauthenticated access");
        AuditEvent::failure(action, target, details).warn();
        ApiError::Unauthenticated
    })
}

/// Parse a request body as JSON without interpreting it.
pub(crate) fn parse_json(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|_| ApiError::Validation("request body must be valid JSON".to_string()))
}
