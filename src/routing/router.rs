//! Route registration and dispatch shared by every substrate.
//!
//! # Responsibilities
//! - Store handlers by pattern, rejecting duplicates at registration
//! - Keep the middleware chain in registration order
//! - Compile the table into an immutable [`Dispatcher`]
//! - Resolve a URL: exact pattern (canonical form), then wildcard, then "unhandled"
//!
//! # Design Decisions
//! - Registration is single-threaded and finishes before any dispatch
//! - The compiled dispatcher is immutable (thread-safe without locks)
//! - Substrates differ only in how the response bytes are delivered

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::routing::context::{Context, PageError};
use crate::routing::middleware::{self, Middleware};
use crate::routing::pattern::{self, Pattern};

/// MIME type used by the `*_html` registration shortcuts.
pub const HTML: &str = "text/html; charset=utf-8";

/// A page handler: writes the page into the context or fails.
pub type Handler = Arc<dyn Fn(&mut Context) -> Result<(), PageError> + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Context) -> Result<(), PageError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Errors raised while registering routes.
///
/// These indicate a bug in route registration code; the build aborts on them.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("pattern {0} is already registered")]
    Duplicate(Pattern),

    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },
}

struct Route {
    mime: String,
    handler: Handler,
}

/// Mutable route table filled during registration.
#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<Pattern, Route>,
    /// Registration order, used for deterministic URL listings.
    order: Vec<Pattern>,
    middleware: Vec<Middleware>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware to the chain.
    pub fn around(&mut self, middleware: Middleware) {
        self.middleware.push(middleware);
    }

    /// Register `handler` under `pattern`.
    pub fn insert(&mut self, pattern: Pattern, mime: &str, handler: Handler) -> Result<(), RouteError> {
        if let Pattern::Literal(path) = &pattern {
            if path.contains(['{', '}', '*']) {
                return Err(RouteError::InvalidPattern {
                    pattern: path.clone(),
                    reason: "literal patterns cannot contain '{', '}' or '*'",
                });
            }
            if path.split('/').any(|segment| segment.starts_with(':')) {
                return Err(RouteError::InvalidPattern {
                    pattern: path.clone(),
                    reason: "literal path segments cannot start with ':'",
                });
            }
        }
        if self.routes.contains_key(&pattern) {
            return Err(RouteError::Duplicate(pattern));
        }

        tracing::trace!(pattern = %pattern, mime, "Route registered");
        self.order.push(pattern.clone());
        self.routes.insert(
            pattern,
            Route {
                mime: mime.to_owned(),
                handler,
            },
        );
        Ok(())
    }

    /// Every registered URL except the wildcard, in registration order.
    pub fn static_urls(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|p| p.url().map(str::to_owned))
            .collect()
    }

    /// Registered patterns in registration order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.order
    }

    /// Fold the middleware chain around every handler and freeze the table.
    pub fn compile(&self) -> Dispatcher {
        let routes = self
            .routes
            .iter()
            .map(|(pattern, route)| {
                let chain = middleware::compose(&self.middleware, Arc::clone(&route.handler));
                (
                    pattern.clone(),
                    CompiledRoute {
                        mime: route.mime.clone(),
                        chain,
                    },
                )
            })
            .collect();
        Dispatcher { routes }
    }
}

struct CompiledRoute {
    mime: String,
    chain: Handler,
}

/// A rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Immutable, compiled route table.
pub struct Dispatcher {
    routes: HashMap<Pattern, CompiledRoute>,
}

impl Dispatcher {
    /// Resolve `url` and run its middleware chain and handler.
    pub fn dispatch(&self, url: &str) -> Result<Response, PageError> {
        let route = self
            .lookup(url)
            .ok_or_else(|| PageError::Unhandled { url: url.to_owned() })?;

        let segments = pattern::segments(url)?;
        let span = tracing::info_span!("page", url = %url);
        let _guard = span.enter();

        let mut ctx = Context::new(url, segments, span.clone(), &route.mime);
        (route.chain)(&mut ctx)?;

        Ok(Response {
            content_type: route.mime.clone(),
            body: ctx.into_body(),
        })
    }

    fn lookup(&self, url: &str) -> Option<&CompiledRoute> {
        self.routes
            .get(&Pattern::literal(url))
            .or_else(|| self.routes.get(&Pattern::Wildcard))
    }

    /// Whether a handler is registered for `pattern`.
    pub fn handles(&self, pattern: &Pattern) -> bool {
        self.routes.contains_key(pattern)
    }
}

/// Resolves URLs to response bytes through a router's own dispatch path,
/// without any network I/O.
#[derive(Clone)]
pub struct Requester {
    dispatcher: Arc<Dispatcher>,
}

impl Requester {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Render `url` and return its body.
    pub fn get(&self, url: &str) -> Result<Vec<u8>, PageError> {
        self.dispatcher.dispatch(url).map(|response| response.body)
    }

    /// Render `url` and return the full response.
    pub fn dispatch(&self, url: &str) -> Result<Response, PageError> {
        self.dispatcher.dispatch(url)
    }
}

/// The routing capability shared by the generate and live substrates.
///
/// Implementors only expose their [`RouteTable`]; registration, listing and
/// dispatch behave identically across substrates.
pub trait Router: Send {
    fn table(&self) -> &RouteTable;

    fn table_mut(&mut self) -> &mut RouteTable;

    /// Append a middleware; the first registered is outermost.
    fn around(&mut self, middleware: Middleware) {
        self.table_mut().around(middleware);
    }

    fn get_root_html(&mut self, handler: Handler) -> Result<(), RouteError> {
        self.table_mut().insert(Pattern::Root, HTML, handler)
    }

    fn get_wildcard_html(&mut self, handler: Handler) -> Result<(), RouteError> {
        self.table_mut().insert(Pattern::Wildcard, HTML, handler)
    }

    fn get_html(&mut self, pattern: &str, handler: Handler) -> Result<(), RouteError> {
        self.get(pattern, HTML, handler)
    }

    fn get(&mut self, pattern: &str, mime: &str, handler: Handler) -> Result<(), RouteError> {
        self.table_mut().insert(Pattern::literal(pattern), mime, handler)
    }

    /// All registered patterns except the wildcard; the root is `"/"`.
    fn static_urls(&self) -> Vec<String> {
        self.table().static_urls()
    }

    /// A requester dispatching through this router's current routes.
    fn requester(&self) -> Requester {
        Requester::new(self.table().compile())
    }
}
