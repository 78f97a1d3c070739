//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (fixed window per client IP and endpoint)
//!     → headers.rs (hardening headers, CORS)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Rate limiting runs first so rejected requests do no further work
//! - Fail closed: reject on any security check failure

pub mod headers;
pub mod rate_limit;

pub use headers::{apply_security_headers, cors_middleware, CorsPolicy};
pub use rate_limit::{rate_limit_middleware, Admission, RateLimiter};
