//! Static generation.
//!
//! # Responsibilities
//! - Create the output directory
//! - Register the site's routes on a fresh in-memory router and tracker
//! - Render independent pages as one pool batch, then dependent pages as another
//! - Write each rendered page under the output root
//!
//! # Design Decisions
//! - Fail fast on route registration, output directory and URL-set errors
//! - Per-page failures are logged and collected; the build still succeeds
//! - The dependent batch starts only after the independent batch has returned

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::build::output;
use crate::build::site::{self, Site};
use crate::build::BuildError;
use crate::config::BuildConfig;
use crate::routing::{GenerateRouter, PageError, Requester, Router};
use crate::schedule::{Pool, Task};

/// Build phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Independent,
    Dependent,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Independent => write!(f, "independent"),
            Phase::Dependent => write!(f, "dependent"),
        }
    }
}

/// A page that failed to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub url: String,
    pub phase: Phase,
    pub error: String,
}

/// Outcome of a generation run that was not aborted.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// URLs written to disk.
    pub written: Vec<String>,
    pub failed: Vec<PageFailure>,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Render every page of `site` into `config.output_dir`.
pub async fn generate(site: Arc<dyn Site>, config: &BuildConfig) -> Result<BuildReport, BuildError> {
    let start = Instant::now();

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|source| BuildError::OutputDir {
            path: config.output_dir.clone(),
            source,
        })?;

    let mut router = GenerateRouter::new();
    let mut tracker = site::tracker_for(&site);
    site.set_routes(&mut router, &mut tracker)?;
    tracker.set_static_urls(router.static_urls());
    let requester = router.requester();

    let mut report = BuildReport::default();

    let independent = tracker.independent_urls()?;
    run_phase(Phase::Independent, independent, &requester, config, &mut report).await;

    let dependent = tracker.dependent_urls();
    run_phase(Phase::Dependent, dependent, &requester, config, &mut report).await;

    report.elapsed = start.elapsed();
    tracing::info!(
        written = report.written.len(),
        failed = report.failed.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        output = %config.output_dir.display(),
        "Build finished"
    );
    Ok(report)
}

async fn run_phase(
    phase: Phase,
    urls: Vec<String>,
    requester: &Requester,
    config: &BuildConfig,
    report: &mut BuildReport,
) {
    tracing::info!(phase = %phase, pages = urls.len(), "Build phase starting");

    let tasks = urls
        .into_iter()
        .map(|url| page_task(phase, url, requester.clone(), &config.output_dir))
        .collect();

    let mut pool = Pool::new(tasks, config.concurrency);
    pool.run().await;

    pool.each_error(|task, error| {
        tracing::error!(phase = %phase, url = %task.name(), error = %error, "Page failed");
        report.failed.push(PageFailure {
            url: task.name().to_owned(),
            phase,
            error: error.to_string(),
        });
    });
    report.written.extend(
        pool.tasks()
            .iter()
            .filter(|task| task.executed() && task.error().is_none())
            .map(|task| task.name().to_owned()),
    );
}

fn page_task(phase: Phase, url: String, requester: Requester, output_dir: &Path) -> Task {
    let span = tracing::info_span!("build", phase = %phase, url = %url);
    let root: PathBuf = output_dir.to_path_buf();
    let name = url.clone();

    Task::new(
        name,
        span,
        Box::new(move || -> Result<(), PageError> {
            let path = output::page_path(&root, &url)?;
            let body = requester.get(&url)?;
            std::fs::write(&path, body)?;
            tracing::debug!(path = %path.display(), "Page written");
            Ok(())
        }),
    )
}
