//! Vendor CRUD endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::Session;
use crate::http::error::ApiError;
use crate::http::handlers::{parse_json, require_session};
use crate::http::server::AppState;
use crate::observability::{metrics, AuditEvent};
use crate::validation::validate_vendor;
use crate::vendors::{StoreError, Vendor, VendorFilter};

const TARGET: &str = "vendor";

/// Audit a store failure and turn it into a 500.
fn store_failure(
    action: &'static str,
    session: &Session,
    details: Value,
    error: StoreError,
) -> ApiError {
    AuditEvent::failure(action, TARGET, details).by(session).error(&error);
    ApiError::from(error)
}

fn not_found(action: &'static str, session: &Session, id: &str) -> ApiError {
    AuditEvent::failure(
        action,
        TARGET,
        json!({ "vendorId": id, "reason": "vendor does not exist" }),
    )
    .by(session)
    .warn();
    ApiError::NotFound
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<Vec<Vendor>>, ApiError> {
    const ACTION: &str = "vendor_list";
    let session = require_session(&state, &headers, ACTION, TARGET, json!({ "query": uri.query() }))?;

    // Parsed after the session check so anonymous callers always get 401.
    let Query(filter) = Query::<VendorFilter>::try_from_uri(&uri).map_err(|e| {
        AuditEvent::failure(ACTION, TARGET, json!({ "query": uri.query(), "error": e.body_text() }))
            .by(&session)
            .warn();
        ApiError::Validation("query parameters are invalid".to_string())
    })?;
    let details = json!({ "search": filter.search, "tag": filter.tag });

    let vendors = state
        .vendors
        .list(&filter)
        .await
        .map_err(|e| store_failure(ACTION, &session, details.clone(), e))?;

    AuditEvent::success(ACTION, TARGET, json!({ "count": vendors.len() }))
        .by(&session)
        .info();
    Ok(Json(vendors))
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Vendor>, ApiError> {
    const ACTION: &str = "vendor_create";
    let session = require_session(&state, &headers, ACTION, TARGET, json!({}))?;

    let payload = parse_json(&body)?;
    let input = validate_vendor(&payload).map_err(|e| {
        AuditEvent::failure(ACTION, TARGET, json!({ "error": e.message, "input": payload }))
            .by(&session)
            .warn();
        ApiError::from(e)
    })?;

    let vendor = state
        .vendors
        .create(input)
        .await
        .map_err(|e| store_failure(ACTION, &session, json!({}), e))?;

    AuditEvent::success(ACTION, TARGET, json!({ "vendorId": vendor.id }))
        .by(&session)
        .info();
    metrics::record_vendor_mutation("create");
    Ok(Json(vendor))
}

pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vendor>, ApiError> {
    const ACTION: &str = "vendor_get";
    let session = require_session(&state, &headers, ACTION, TARGET, json!({ "vendorId": id }))?;

    let Ok(vendor_id) = Uuid::parse_str(&id) else {
        return Err(not_found(ACTION, &session, &id));
    };
    let vendor = state
        .vendors
        .get(vendor_id)
        .await
        .map_err(|e| store_failure(ACTION, &session, json!({ "vendorId": id }), e))?
        .ok_or_else(|| not_found(ACTION, &session, &id))?;

    AuditEvent::success(ACTION, TARGET, json!({ "vendorId": vendor.id }))
        .by(&session)
        .info();
    Ok(Json(vendor))
}

pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Vendor>, ApiError> {
    const ACTION: &str = "vendor_update";
    let session = require_session(&state, &headers, ACTION, TARGET, json!({ "vendorId": id }))?;

    let payload = parse_json(&body)?;
    let input = validate_vendor(&payload).map_err(|e| {
        AuditEvent::failure(
            ACTION,
            TARGET,
            json!({ "vendorId": id, "error": e.message, "input": payload }),
        )
        .by(&session)
        .warn();
        ApiError::from(e)
    })?;

    let Ok(vendor_id) = Uuid::parse_str(&id) else {
        return Err(not_found(ACTION, &session, &id));
    };
    let vendor = state
        .vendors
        .update(vendor_id, input)
        .await
        .map_err(|e| store_failure(ACTION, &session, json!({ "vendorId": id }), e))?
        .ok_or_else(|| not_found(ACTION, &session, &id))?;

    AuditEvent::success(ACTION, TARGET, json!({ "vendorId": vendor.id }))
        .by(&session)
        .info();
    metrics::record_vendor_mutation("update");
    Ok(Json(vendor))
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    const ACTION: &str = "vendor_delete";
    let session = require_session(&state, &headers, ACTION, TARGET, json!({ "vendorId": id }))?;

    let Ok(vendor_id) = Uuid::parse_str(&id) else {
        return Err(not_found(ACTION, &session, &id));
    };
    let removed = state
        .vendors
        .delete(vendor_id)
        .await
        .map_err(|e| store_failure(ACTION, &session, json!({ "vendorId": id }), e))?;
    if !removed {
        return Err(not_found(ACTION, &session, &id));
    }

    AuditEvent::success(ACTION, TARGET, json!({ "vendorId": id }))
        .by(&session)
        .info();
    metrics::record_vendor_mutation("delete");
    Ok(StatusCode::NO_CONTENT)
}
