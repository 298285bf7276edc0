//! Network substrate used when hosting.
//!
//! # Responsibilities
//! - Mount every literal pattern on its own axum route
//! - Mount the root and wildcard patterns on the catch-all fallback
//! - Run the shared dispatch path for each inbound GET
//! - Map page errors to 4xx responses carrying the error text
//!
//! # Design Decisions
//! - Only GET invokes handlers; every other method gets an empty 405
//! - The fallback leaves room for other services (static assets) to be nested
//! - Handlers may block (file reads, rate-limited upstream calls), so dispatch
//!   runs on the blocking thread pool

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
};

use crate::routing::context::PageError;
use crate::routing::pattern::Pattern;
use crate::routing::router::{Dispatcher, RouteTable, Router};

/// Router whose pages are written straight to HTTP responses.
#[derive(Default)]
pub struct LiveRouter {
    table: RouteTable,
}

impl LiveRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile the registered routes into an axum router.
    pub fn into_service(self) -> axum::Router {
        let dispatcher = Arc::new(self.table.compile());
        let mut app = axum::Router::new();
        let mut mounted = HashSet::new();

        for pattern in self.table.patterns() {
            if let Some(path) = pattern.mount_path() {
                if mounted.insert(path.clone()) {
                    app = app.route(&path, any(serve_page));
                }
            }
        }

        if dispatcher.handles(&Pattern::Root) || dispatcher.handles(&Pattern::Wildcard) {
            app = app.fallback(serve_page);
        }

        tracing::debug!(routes = mounted.len(), "Live routes mounted");
        app.with_state(dispatcher)
    }
}

impl Router for LiveRouter {
    fn table(&self) -> &RouteTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut RouteTable {
        &mut self.table
    }
}

/// Status code for a failed dispatch.
pub fn status_for(error: &PageError) -> StatusCode {
    match error {
        PageError::Unhandled { .. } | PageError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    }
}

async fn serve_page(State(dispatcher): State<Arc<Dispatcher>>, method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let url = uri.path().to_owned();
    let result = {
        let url = url.clone();
        tokio::task::spawn_blocking(move || dispatcher.dispatch(&url)).await
    };

    match result {
        Ok(Ok(page)) => ([(header::CONTENT_TYPE, page.content_type)], page.body).into_response(),
        Ok(Err(e)) => {
            tracing::warn!(url = %url, error = %e, "Page dispatch failed");
            (status_for(&e), e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Page handler panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, "page handler panicked").into_response()
        }
    }
}
