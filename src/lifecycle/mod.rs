//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     CLI → Load config → Validate → Init logging → Pick mode
//!
//! Shutdown (signals.rs):
//!     SIGINT → stop accepting → drain in-flight requests → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Generation ignores signals; it finishes or fails on its own

pub mod signals;

pub use signals::shutdown_signal;
