//! Shared fixtures for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sitebuild::config::BuildConfig;
use sitebuild::routing::{handler, PageError, RouteError, Router};
use sitebuild::schedule::Tracker;
use sitebuild::{BoxError, Site};

/// A small site: `/` (dependent), `/about`, and one wildcard page per slug.
#[allow(dead_code)]
pub struct FixtureSite {
    pub wildcard: Vec<String>,
    pub wildcard_error: Option<String>,
    /// Slugs whose handler fails.
    pub failing: Vec<String>,
    /// Mark a URL outside the site as dependent.
    pub unknown_dependent: bool,
    /// Register `/about` twice.
    pub duplicate_route: bool,
    /// The root page reports how many other pages had rendered before it.
    pub root_counts: bool,
    pub rendered: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl FixtureSite {
    pub fn new(slugs: &[&str]) -> Self {
        Self {
            wildcard: slugs.iter().map(|s| s.to_string()).collect(),
            wildcard_error: None,
            failing: Vec::new(),
            unknown_dependent: false,
            duplicate_route: false,
            root_counts: false,
            rendered: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn into_site(self) -> Arc<dyn Site> {
        Arc::new(self)
    }
}

impl Site for FixtureSite {
    fn set_routes(&self, router: &mut dyn Router, tracker: &mut Tracker) -> Result<(), RouteError> {
        let rendered = Arc::clone(&self.rendered);
        let root_counts = self.root_counts;
        router.get_root_html(handler(move |ctx| {
            if root_counts {
                let seen = rendered.load(Ordering::SeqCst);
                ctx.write_str(&format!("rendered {seen}"));
            } else {
                ctx.write_str("root");
            }
            Ok(())
        }))?;
        tracker.add_dependent_url("/");

        let rendered = Arc::clone(&self.rendered);
        router.get_html("/about", handler(move |ctx| {
            rendered.fetch_add(1, Ordering::SeqCst);
            ctx.write_str("about");
            Ok(())
        }))?;

        let rendered = Arc::clone(&self.rendered);
        let failing = self.failing.clone();
        router.get_wildcard_html(handler(move |ctx| {
            let slug = ctx.segment().unwrap_or_default().to_owned();
            if failing.contains(&slug) {
                return Err(PageError::Render(format!("{slug} is broken")));
            }
            // Give the root page a chance to run early if the phases overlapped.
            std::thread::sleep(std::time::Duration::from_millis(5));
            rendered.fetch_add(1, Ordering::SeqCst);
            ctx.write_str(&format!("page {slug}"));
            Ok(())
        }))?;

        if self.unknown_dependent {
            tracker.add_dependent_url("/ghost");
        }
        if self.duplicate_route {
            router.get_html("/about", handler(|_ctx| Ok(())))?;
        }
        Ok(())
    }

    fn wildcard_urls(&self) -> Result<Vec<String>, BoxError> {
        match &self.wildcard_error {
            Some(message) => Err(message.clone().into()),
            None => Ok(self.wildcard.clone()),
        }
    }
}

#[allow(dead_code)]
pub fn build_config(output_dir: &std::path::Path, concurrency: usize) -> BuildConfig {
    BuildConfig {
        output_dir: output_dir.to_path_buf(),
        concurrency,
    }
}
