//! Independent/dependent URL partitioning.
//!
//! # Responsibilities
//! - Know every addressable URL: static patterns plus wildcard expansions
//! - Record which URLs must render after everything else
//! - Split the full URL set into the two build phases
//!
//! # Design Decisions
//! - Two phases only; there is no transitive dependency graph
//! - A dependent URL outside the full URL set is an error, never dropped
//! - Wildcard expansions are computed on demand through a callback
//! - Every URL is kept in canonical form, so `"about"` and `"/about"` are one page

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::routing::pattern::canonical_url;
use crate::BoxError;

/// Callback enumerating the URLs served by the wildcard pattern.
pub type WildcardUrls = Arc<dyn Fn() -> Result<Vec<String>, BoxError> + Send + Sync>;

/// Errors computing the URL partition.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("failed to enumerate wildcard urls: {0}")]
    Wildcard(#[source] BoxError),

    #[error("dependent url {url:?} is not an addressable url")]
    UnknownDependent { url: String },
}

/// Partitions a site's URLs into independent and dependent build phases.
pub struct Tracker {
    static_urls: Vec<String>,
    wildcard_urls: WildcardUrls,
    dependent: HashSet<String>,
}

impl Tracker {
    pub fn new(wildcard_urls: WildcardUrls) -> Self {
        Self {
            static_urls: Vec::new(),
            wildcard_urls,
            dependent: HashSet::new(),
        }
    }

    /// Record the router's static URLs once registration is complete.
    pub fn set_static_urls(&mut self, urls: Vec<String>) {
        self.static_urls = urls.iter().map(|url| canonical_url(url)).collect();
    }

    /// Mark `url` as rendering only after every independent URL.
    pub fn add_dependent_url(&mut self, url: impl AsRef<str>) {
        self.dependent.insert(canonical_url(url.as_ref()));
    }

    /// Static URLs followed by wildcard expansions, canonical and without
    /// duplicates.
    pub fn all_urls(&self) -> Result<Vec<String>, TrackerError> {
        let expanded = (self.wildcard_urls)().map_err(TrackerError::Wildcard)?;

        let mut seen = HashSet::new();
        Ok(self
            .static_urls
            .iter()
            .cloned()
            .chain(expanded.iter().map(|url| canonical_url(url)))
            .filter(|url| seen.insert(url.clone()))
            .collect())
    }

    /// Every URL not marked dependent.
    pub fn independent_urls(&self) -> Result<Vec<String>, TrackerError> {
        let all = self.all_urls()?;

        let known: HashSet<&str> = all.iter().map(String::as_str).collect();
        if let Some(url) = self.dependent.iter().find(|url| !known.contains(url.as_str())) {
            return Err(TrackerError::UnknownDependent { url: url.clone() });
        }

        Ok(all
            .into_iter()
            .filter(|url| !self.dependent.contains(url))
            .collect())
    }

    /// The dependent URLs, in no particular order.
    pub fn dependent_urls(&self) -> Vec<String> {
        self.dependent.iter().cloned().collect()
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("static_urls", &self.static_urls)
            .field("dependent", &self.dependent)
            .finish_non_exhaustive()
    }
}
