//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router dispatch → "page" span (url)
//! Pool task       → "build" span (phase, url)
//! HTTP servers    → TraceLayer request spans
//!     → logging.rs (fmt subscriber, EnvFilter)
//! ```

pub mod logging;
