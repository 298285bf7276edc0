//! sitebuild
//!
//! Renders a site's pages to static files, hosts them live, or serves a
//! previous build, using one set of route handlers for every mode.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌───────────────────────────────────────────────────────────┐
//!                 │                        SITEBUILD                           │
//!                 │                                                            │
//!   CLI + config  │  ┌─────────┐   ┌──────────────┐   ┌────────────────────┐  │
//!   ──────────────┼─▶│  build  │──▶│ Site         │──▶│ routing            │  │
//!                 │  │  (mode) │   │ set_routes   │   │ Router + middleware│  │
//!                 │  └────┬────┘   └──────┬───────┘   └─────────┬──────────┘  │
//!                 │       │               │                     │             │
//!                 │       │               ▼                     ▼             │
//!                 │       │        ┌──────────────┐   ┌────────────────────┐  │
//!                 │       │        │ schedule     │   │ generate: Requester│──┼──▶ files
//!                 │       └───────▶│ Tracker+Pool │──▶│ live: axum routes  │──┼──▶ HTTP
//!                 │                └──────────────┘   └────────────────────┘  │
//!                 │                                                            │
//!                 │  ┌──────────────────────────────────────────────────────┐ │
//!                 │  │ Cross-cutting: config · observability · lifecycle     │ │
//!                 │  └──────────────────────────────────────────────────────┘ │
//!                 └───────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use sitebuild::build::{self, Mode, Site};
use sitebuild::config::{read_config, validate_config, ConfigError, SiteConfig};
use sitebuild::observability::logging;
use sitebuild::site::ContentSite;

#[derive(Parser)]
#[command(name = "sitebuild")]
#[command(about = "Build a site to static files, host it live, or serve a previous build", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render pages live on every request instead of generating files
    #[arg(long, conflicts_with = "serve")]
    host: bool,

    /// Serve previously generated files
    #[arg(long)]
    serve: bool,

    /// Output directory for generated pages
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory of content files
    #[arg(long)]
    content: Option<PathBuf>,

    /// Number of pages rendered in parallel
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Port for --host or --serve
    #[arg(short, long)]
    port: Option<u16>,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.host {
            Mode::Host
        } else if self.serve {
            Mode::FileServe
        } else {
            Mode::Generate
        }
    }

    fn apply(&self, config: &mut SiteConfig) {
        if let Some(output) = &self.output {
            config.build.output_dir = output.clone();
        }
        if let Some(content) = &self.content {
            config.site.content_dir = content.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.build.concurrency = concurrency;
        }
        if let Some(port) = self.port {
            match self.mode() {
                Mode::Host => config.host.bind_address = with_port(&config.host.bind_address, port),
                Mode::FileServe => {
                    config.file_serve.bind_address = with_port(&config.file_serve.bind_address, port)
                }
                Mode::Generate => {}
            }
        }
    }
}

/// File config (or defaults) with flag overrides applied, validated once.
fn resolve_config(cli: &Cli) -> Result<SiteConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => SiteConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn with_port(address: &str, port: u16) -> String {
    match address.parse::<SocketAddr>() {
        Ok(mut addr) => {
            addr.set_port(port);
            addr.to_string()
        }
        Err(_) => format!("127.0.0.1:{port}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;

    logging::init(&config.observability);
    tracing::info!(
        output = %config.build.output_dir.display(),
        content = %config.site.content_dir.display(),
        concurrency = config.build.concurrency,
        "Configuration loaded"
    );

    let site: Arc<dyn Site> = Arc::new(ContentSite::new(&config.site));
    build::run(cli.mode(), site, &config).await?;

    Ok(())
}
