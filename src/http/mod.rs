//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! Host:
//!     TCP listener → TraceLayer → TimeoutLayer
//!         → asset mount (ServeDir) | page routes (routing::live) → response
//!
//! File-serve:
//!     TCP listener → TraceLayer → "/" = index file | ServeDir(output) → response
//! ```

pub mod server;

pub use server::{FileServer, HostServer, ServerError};
