//! Login, logout and session inspection.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::{cookie, Session};
use crate::http::error::ApiError;
use crate::http::handlers::parse_json;
use crate::http::server::AppState;
use crate::observability::{metrics, AuditEvent};
use crate::validation::validate_login;

const TARGET: &str = "session";
const LOGIN_PAGE: &str = "/login";

pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let payload = parse_json(&body)?;
    let input = match validate_login(&payload) {
        Ok(input) => input,
        Err(e) => {
            AuditEvent::failure("login", TARGET, json!({ "error": e.message })).warn();
            metrics::record_login("invalid");
            return Err(e.into());
        }
    };

    if !state.credentials.matches(&input.email, &input.password) {
        AuditEvent::failure(
            "login",
            TARGET,
            json!({ "email": input.email, "reason": "credential mismatch" }),
        )
        .warn();
        metrics::record_login("rejected");
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "error": "Invalid email or password" })),
        )
            .into_response());
    }

    let session = Session::for_email(&input.email);
    let token = state.sessions.issue(&session).map_err(|e| {
        AuditEvent::failure("login", TARGET, json!({})).by(&session).error(&e);
        ApiError::from(e)
    })?;

    let set_cookie = cookie::session_cookie(
        &token,
        state.config.auth.session_ttl_secs,
        state.config.environment.is_production(),
    );

    AuditEvent::success("login", TARGET, json!({ "email": session.email }))
        .by(&session)
        .info();
    metrics::record_login("success");

    let body = Json(json!({
        "success": true,
        "user": { "email": session.email, "role": session.role },
    }));
    Ok(([(header::SET_COOKIE, set_cookie)], body).into_response())
}

/// Clear the session cookie and send the client to the login page.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = cookie::session_token(&headers);
    let event = AuditEvent::success("logout", TARGET, json!({}));
    match state.sessions.verify(token.as_deref()) {
        Some(session) => event.by(&session).info(),
        None => event.info(),
    }

    (
        StatusCode::FOUND,
        [
            (header::LOCATION, HeaderValue::from_static(LOGIN_PAGE)),
            (header::SET_COOKIE, cookie::removal_cookie()),
        ],
    )
        .into_response()
}

pub async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = cookie::session_token(&headers);
    match state.sessions.verify(token.as_deref()) {
        Some(session) => {
            AuditEvent::success("session_check", TARGET, json!({}))
                .by(&session)
                .info();
            Ok(Json(json!({
                "success": true,
                "user": { "email": session.email, "role": session.role },
            })))
        }
        None => {
            let reason = if token.is_some() {
                "invalid token"
            } else {
                "missing token"
            };
            AuditEvent::failure("session_check", TARGET, json!({ "reason": reason })).warn();
            Err(ApiError::Unauthenticated)
        }
    }
}
