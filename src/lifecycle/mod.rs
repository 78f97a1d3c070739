//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Open store → Bind
//!
//! Shutdown:
//!     Ctrl+C or Shutdown::trigger → Stop accepting → Drain → Flush store
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
