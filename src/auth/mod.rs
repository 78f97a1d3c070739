//! Authentication: the configured credential pair and signed session cookies.
//!
//! # Data Flow
//! ```text
//! POST /api/auth/login
//!     → Credentials::matches (constant-time compare)
//!     → SessionCodec::issue → cookie.rs (Set-Cookie)
//!
//! Protected request
//!     → cookie.rs (extract session-token)
//!     → SessionCodec::verify → Option<Session>
//! ```

pub mod cookie;
pub mod session;

use subtle::ConstantTimeEq;

use crate::config::AuthConfig;

pub use cookie::SESSION_COOKIE_NAME;
pub use session::{Session, SessionCodec, SessionError};

/// The single accepted email/password pair.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.user_email, &config.user_password)
    }

    /// Both fields are compared in full regardless of the first result.
    pub fn matches(&self, email: &str, password: &str) -> bool {
        let email_ok = self.email.as_bytes().ct_eq(email.as_bytes());
        let password_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        bool::from(email_ok & password_ok)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
