//! Audit events for session-sensitive and mutating operations.
//!
//! Each event is a `tracing` record on the `audit` target carrying the
//! acting user (or `anonymous`), the action, its target, the outcome and
//! free-form details. Failures also carry the full error chain. Emission is
//! fire-and-forget.

use serde_json::Value;

use crate::auth::Session;
use crate::http::error::error_chain;

pub const ANONYMOUS: &str = "anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    Success,
    Error,
}

impl AuditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One audit record.
#[derive(Debug, Clone)]
pub struct AuditEvent<'a> {
    pub action: &'static str,
    pub target: &'static str,
    pub status: AuditStatus,
    pub details: Value,
    pub session: Option<&'a Session>,
}

impl<'a> AuditEvent<'a> {
    pub fn success(action: &'static str, target: &'static str, details: Value) -> Self {
        Self {
            action,
            target,
            status: AuditStatus::Success,
            details,
            session: None,
        }
    }

    pub fn failure(action: &'static str, target: &'static str, details: Value) -> Self {
        Self {
            status: AuditStatus::Error,
            ..Self::success(action, target, details)
        }
    }

    pub fn by(mut self, session: &'a Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn user_id(&self) -> &str {
        self.session.map_or(ANONYMOUS, |s| s.user_id.as_str())
    }

    pub fn info(&self) {
        tracing::info!(
            target: "audit",
            user_id = %self.user_id(),
            action = self.action,
            target_kind = self.target,
            status = self.status.as_str(),
            details = %self.details,
        );
    }

    pub fn warn(&self) {
        tracing::warn!(
            target: "audit",
            user_id = %self.user_id(),
            action = self.action,
            target_kind = self.target,
            status = self.status.as_str(),
            details = %self.details,
        );
    }

    pub fn error(&self, error: &(dyn std::error::Error + 'static)) {
        tracing::error!(
            target: "audit",
            user_id = %self.user_id(),
            action = self.action,
            target_kind = self.target,
            status = self.status.as_str(),
            details = %self.details,
            error = %error_chain(error),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_id_defaults_to_anonymous() {
        let event = AuditEvent::failure("vendor_get", "vendor", json!({}));
        assert_eq!(event.user_id(), ANONYMOUS);
        assert_eq!(event.status, AuditStatus::Error);

        let session = Session::for_email("test@example.com");
        let event = AuditEvent::success("vendor_get", "vendor", json!({})).by(&session);
        assert_eq!(event.user_id(), session.user_id);
        assert_eq!(event.status.as_str(), "success");
    }
}
