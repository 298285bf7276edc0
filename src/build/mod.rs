//! Build orchestration.
//!
//! # Data Flow
//! ```text
//! Start → Mode (fixed for the process)
//!     Generate:  output dir → GenerateRouter + Tracker → Site::set_routes
//!                → independent batch → dependent batch → files
//!     Host:      LiveRouter + Tracker → Site::set_routes → asset mount → serve
//!     FileServe: output dir → static file server
//! → Terminal (success | error)
//! ```
//!
//! # Design Decisions
//! - Router and tracker are built fresh for each run
//! - Registration, output-dir and URL-set errors abort; page errors do not

pub mod generate;
pub mod output;
pub mod site;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::SiteConfig;
use crate::http::{FileServer, HostServer, ServerError};
use crate::lifecycle::shutdown_signal;
use crate::routing::RouteError;
use crate::schedule::TrackerError;

pub use generate::{generate, BuildReport, PageFailure, Phase};
pub use site::Site;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("route registration failed: {0}")]
    Routes(#[from] RouteError),

    #[error("failed to compute page urls: {0}")]
    Urls(#[from] TrackerError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Operating mode, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Generate,
    Host,
    FileServe,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Generate => write!(f, "generate"),
            Mode::Host => write!(f, "host"),
            Mode::FileServe => write!(f, "file-serve"),
        }
    }
}

/// Run `mode` to completion.
pub async fn run(mode: Mode, site: Arc<dyn Site>, config: &SiteConfig) -> Result<(), BuildError> {
    tracing::info!(mode = %mode, "Starting");

    match mode {
        Mode::Generate => {
            let report = generate(site, &config.build).await?;
            for failure in &report.failed {
                eprintln!("error: {} ({}): {}", failure.url, failure.phase, failure.error);
            }
            println!(
                "Built {} pages in {:.2?} ({} failed)",
                report.written.len(),
                report.elapsed,
                report.failed.len()
            );
        }
        Mode::Host => {
            let server = HostServer::new(site, &config.host)?;
            let listener = server.bind().await?;
            server.run(listener, shutdown_signal()).await?;
        }
        Mode::FileServe => {
            let server = FileServer::new(&config.build.output_dir, &config.file_serve);
            let listener = server.bind().await?;
            server.run(listener, shutdown_signal()).await?;
        }
    }

    tracing::info!(mode = %mode, "Finished");
    Ok(())
}
