//! Built-in content site.
//!
//! # Data Flow
//! ```text
//! content_dir/*.md
//!     → wildcard_urls (one url per file stem)
//!     → "*"         → ContentCache::load(slug) → markdown → pages::document
//!     → "/"         → ContentCache::load_all   → pages::index   (dependent)
//!     → "/feed.xml" → ContentCache::load_all   → pages::feed    (dependent)
//! ```
//!
//! # Design Decisions
//! - One cache per site instance, shared by every handler it registers
//! - Aggregate pages are dependent so they read a cache the document pages filled

pub mod content;
pub mod markdown;
pub mod pages;

use std::sync::Arc;

use crate::build::Site;
use crate::config::ContentConfig;
use crate::routing::{handler, middleware, PageError, RouteError, Router};
use crate::schedule::Tracker;
use crate::BoxError;

pub use content::{ContentCache, Document};

/// URL of the Atom feed.
pub const FEED_URL: &str = "/feed.xml";

/// MIME type of the Atom feed.
pub const ATOM: &str = "application/atom+xml";

/// A site serving one page per content file plus an index and a feed.
#[derive(Debug)]
pub struct ContentSite {
    title: Arc<str>,
    base_url: Arc<str>,
    cache: Arc<ContentCache>,
}

impl ContentSite {
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            title: Arc::from(config.title.as_str()),
            base_url: Arc::from(config.base_url.as_str()),
            cache: Arc::new(ContentCache::new(&config.content_dir)),
        }
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }
}

impl Site for ContentSite {
    fn set_routes(&self, router: &mut dyn Router, tracker: &mut Tracker) -> Result<(), RouteError> {
        router.around(middleware::trace_pages());

        let (cache, title) = (Arc::clone(&self.cache), Arc::clone(&self.title));
        router.get_wildcard_html(handler(move |ctx| {
            let slug = ctx
                .segment()
                .ok_or_else(|| PageError::NotFound(ctx.url().to_owned()))?
                .to_owned();
            let doc = cache.load(&slug)?;
            pages::document(ctx, &title, &doc)
        }))?;

        let (cache, title) = (Arc::clone(&self.cache), Arc::clone(&self.title));
        router.get_root_html(handler(move |ctx| {
            let docs = cache.load_all()?;
            pages::index(ctx, &title, &docs)
        }))?;
        tracker.add_dependent_url("/");

        let (cache, title, base_url) = (
            Arc::clone(&self.cache),
            Arc::clone(&self.title),
            Arc::clone(&self.base_url),
        );
        router.get(FEED_URL, ATOM, handler(move |ctx| {
            let docs = cache.load_all()?;
            pages::feed(ctx, &title, &base_url, &docs)
        }))?;
        tracker.add_dependent_url(FEED_URL);

        Ok(())
    }

    fn wildcard_urls(&self) -> Result<Vec<String>, BoxError> {
        Ok(self.cache.slugs()?)
    }
}
