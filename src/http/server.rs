//! HTTP servers for the host and file-serve modes.
//!
//! # Responsibilities
//! - Host: register the site on a live router, mount pre-built assets, serve
//! - File-serve: expose a generated output directory as static files
//! - Wire up middleware (tracing, request timeout)
//! - Bind listeners and run until shutdown
//!
//! # Design Decisions
//! - Route registration happens before the listener is bound
//! - Extensionless generated pages are served as HTML

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue},
    middleware::map_response,
    response::Response,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::build::output::INDEX_FILE;
use crate::build::site::{self, Site};
use crate::config::{FileServeConfig, HostConfig};
use crate::routing::{LiveRouter, RouteError, Router, HTML};

/// Errors binding or running a server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

async fn bind(address: &str) -> Result<TcpListener, ServerError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.to_owned(),
            source,
        })?;
    if let Ok(local) = listener.local_addr() {
        tracing::info!(address = %local, "Listening for connections");
    }
    Ok(listener)
}

async fn serve<F>(listener: TcpListener, app: axum::Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = listener.local_addr().map_err(ServerError::Serve)?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Serves a site's pages live, rendering on every request.
pub struct HostServer {
    app: axum::Router,
    bind_address: String,
}

impl HostServer {
    /// Register `site` on a live router and build the HTTP service.
    pub fn new(site: Arc<dyn Site>, config: &HostConfig) -> Result<Self, RouteError> {
        let mut router = LiveRouter::new();
        // Dependent markers only matter for generation.
        let mut tracker = site::tracker_for(&site);
        site.set_routes(&mut router, &mut tracker)?;

        tracing::info!(static_urls = router.static_urls().len(), "Routes registered");

        Ok(Self {
            app: Self::build_router(router, config),
            bind_address: config.bind_address.clone(),
        })
    }

    #[allow(deprecated)]
    fn build_router(router: LiveRouter, config: &HostConfig) -> axum::Router {
        let mut app = router.into_service();
        if let Some(dir) = &config.assets_dir {
            tracing::info!(mount = %config.assets_mount, dir = %dir.display(), "Serving assets");
            app = app.nest_service(&config.assets_mount, ServeDir::new(dir));
        }
        app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs))),
        )
    }

    /// The HTTP service, for in-process use.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        bind(&self.bind_address).await
    }

    /// Serve on `listener` until `shutdown` resolves or the listener fails.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        serve(listener, self.app, shutdown).await
    }
}

/// Serves previously generated output as plain files.
pub struct FileServer {
    root: PathBuf,
    app: axum::Router,
    bind_address: String,
}

impl FileServer {
    pub fn new(root: &Path, config: &FileServeConfig) -> Self {
        let app = axum::Router::new()
            .route_service("/", ServeFile::new(root.join(INDEX_FILE)))
            .fallback_service(ServeDir::new(root).append_index_html_on_directories(false))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(map_response(default_to_html)),
            );

        Self {
            root: root.to_path_buf(),
            app,
            bind_address: config.bind_address.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        bind(&self.bind_address).await
    }

    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(root = %self.root.display(), "Serving generated files");
        serve(listener, self.app, shutdown).await
    }
}

// Generated pages have no extension, so the guessed type is octet-stream.
async fn default_to_html(mut response: Response) -> Response {
    let guessed_binary = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v == "application/octet-stream");
    if guessed_binary {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(HTML));
    }
    response
}
