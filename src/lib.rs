//! Dual-mode content build orchestrator.
//!
//! The same route-handling code renders pages to static files (generate
//! mode) or to live HTTP responses (host mode).

pub mod build;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod schedule;
pub mod site;

/// Boxed error returned by application collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub use build::{generate, BuildError, BuildReport, Mode, Site};
pub use config::SiteConfig;
pub use routing::{Context, GenerateRouter, LiveRouter, PageError, Router};
pub use schedule::{Pool, Task, Tracker};
