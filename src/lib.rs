//! Vendor management portal: login, signed session cookies and vendor CRUD
//! behind a fixed-window rate limiter.

pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod validation;
pub mod vendors;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
