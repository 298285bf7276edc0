//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (concurrency > 0, timeouts > 0)
//! - Validate socket addresses and the asset mount path
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::SiteConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.build.output_dir.as_os_str().is_empty() {
        errors.push(ValidationError::new("build.output_dir", "must not be empty"));
    }
    if config.build.concurrency == 0 {
        errors.push(ValidationError::new("build.concurrency", "must be at least 1"));
    }

    for (field, address) in [
        ("host.bind_address", &config.host.bind_address),
        ("file_serve.bind_address", &config.file_serve.bind_address),
    ] {
        if address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::new(
                field,
                format!("{address:?} is not a socket address"),
            ));
        }
    }

    let mount = &config.host.assets_mount;
    if !mount.starts_with('/')
        || mount == "/"
        || mount.contains(['{', '}', '*'])
        || mount.split('/').any(|segment| segment.starts_with(':'))
    {
        errors.push(ValidationError::new(
            "host.assets_mount",
            format!("{mount:?} must be a literal path below \"/\""),
        ));
    }
    if config.host.request_timeout_secs == 0 {
        errors.push(ValidationError::new("host.request_timeout_secs", "must be at least 1"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
