//! Signed session tokens.
//!
//! A session is a bearer credential: an HS256 JWT carrying the subject,
//! email and role plus an issued-at time. Nothing is stored server-side.
//! The token carries no expiry; the cookie's max-age bounds its lifetime.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Role granted to the configured user.
pub const DEFAULT_ROLE: &str = "user";

/// An authenticated identity. Only [`SessionCodec::verify`] produces one from
/// request input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub role: String,
}

impl Session {
    /// Session for a login email. The subject is a stable UUID derived from
    /// the email so it survives restarts.
    pub fn for_email(email: &str) -> Self {
        Self {
            user_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, email.as_bytes()).to_string(),
            email: email.to_string(),
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: String,
    iat: i64,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to sign session token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens with one HMAC secret.
#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign `session` into a token stamped with the current time.
    pub fn issue(&self, session: &Session) -> Result<String, SessionError> {
        let claims = Claims {
            sub: session.user_id.clone(),
            email: session.email.clone(),
            role: session.role.clone(),
            iat: Utc::now().timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Decode a token. Absent, malformed and forged tokens all yield `None`.
    pub fn verify(&self, token: Option<&str>) -> Option<Session> {
        let token = token?;
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(Session {
                user_id: data.claims.sub,
                email: data.claims.email,
                role: data.claims.role,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Session verification failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec").finish_non_exhaustive()
    }
}
