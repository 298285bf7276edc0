//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the site
//! builder. All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Static generation settings.
    pub build: BuildConfig,

    /// Live hosting settings.
    pub host: HostConfig,

    /// Settings for serving generated output.
    pub file_serve: FileServeConfig,

    /// Content collaborator settings.
    pub site: ContentConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Static generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory generated pages are written to.
    pub output_dir: PathBuf,

    /// Number of pages rendered in parallel.
    pub concurrency: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("build"),
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Live hosting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Directory of pre-built assets (CSS, images), if any.
    pub assets_dir: Option<PathBuf>,

    /// URL prefix the assets are mounted under.
    pub assets_mount: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            assets_dir: None,
            assets_mount: "/static".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Serving of generated output.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FileServeConfig {
    pub bind_address: String,
}

impl Default for FileServeConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Content directory served by the built-in site.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Site title shown on every page and in the feed.
    pub title: String,

    /// Directory of `*.md` content documents.
    pub content_dir: PathBuf,

    /// Absolute URL the site is published under; used for feed ids and links.
    pub base_url: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            content_dir: PathBuf::from("content"),
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    pub log_filter: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "sitebuild=info,tower_http=info".to_string(),
            log_format: LogFormat::Full,
        }
    }
}
