//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → security (rate limit, headers, CORS)
//!     → handlers/ (session check → validation → store → audit)
//!     → error.rs (failures mapped to status codes)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HttpServer};
