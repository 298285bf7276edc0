//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → CLI flags override individual fields (main.rs)
//!     → validation.rs (semantic checks, once)
//!     → SiteConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs (or none at all)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, ConfigError};
pub use schema::{
    BuildConfig, ContentConfig, FileServeConfig, HostConfig, LogFormat, ObservabilityConfig,
    SiteConfig,
};
pub use validation::{validate_config, ValidationError};
