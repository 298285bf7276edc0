//! Content documents and their shared cache.
//!
//! # Responsibilities
//! - Enumerate content slugs from the content directory
//! - Load and parse documents on first access
//! - Share loaded documents between concurrently rendering pages
//!
//! # Design Decisions
//! - The cache is an explicit object handed to handlers, not a global
//! - Concurrent first loads of one slug may both read the file; the first insert wins
//! - Pages rendered in the independent phase warm the cache for aggregate pages

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;

use crate::routing::PageError;
use crate::site::markdown::render_markdown;

/// File extension of content documents.
pub const CONTENT_EXTENSION: &str = "md";

/// A parsed markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub slug: String,
    pub title: String,
    /// Rendered HTML fragment.
    pub body: String,
}

impl Document {
    /// The first non-empty line is the title (a leading `#` is dropped); the
    /// rest is markdown rendered to HTML.
    pub fn parse(slug: &str, raw: &str) -> Self {
        let mut lines = raw.lines().skip_while(|line| line.trim().is_empty());
        let title = lines
            .next()
            .map(|line| line.trim().trim_start_matches('#').trim().to_owned())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| slug.to_owned());
        let source = lines.collect::<Vec<_>>().join("\n");
        let body = render_markdown(source.trim()).trim_end().to_owned();

        Self {
            slug: slug.to_owned(),
            title,
            body,
        }
    }
}

/// Lazily populated, concurrency-safe document cache.
#[derive(Debug)]
pub struct ContentCache {
    dir: PathBuf,
    documents: DashMap<String, Arc<Document>>,
}

impl ContentCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            documents: DashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Slugs of every content file, sorted.
    pub fn slugs(&self) -> io::Result<Vec<String>> {
        let mut slugs = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(CONTENT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_slug(stem) {
                    slugs.push(stem.to_owned());
                }
            }
        }
        slugs.sort();
        Ok(slugs)
    }

    /// The document for `slug`, reading it on first access.
    pub fn load(&self, slug: &str) -> Result<Arc<Document>, PageError> {
        if let Some(doc) = self.documents.get(slug) {
            return Ok(Arc::clone(doc.value()));
        }
        if !is_valid_slug(slug) {
            return Err(PageError::NotFound(slug.to_owned()));
        }

        let path = self.dir.join(format!("{slug}.{CONTENT_EXTENSION}"));
        let raw = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PageError::NotFound(slug.to_owned()),
            _ => PageError::Io(e),
        })?;
        tracing::debug!(slug, path = %path.display(), "Document loaded");

        let doc = Arc::new(Document::parse(slug, &raw));
        let entry = self.documents.entry(slug.to_owned()).or_insert(doc);
        Ok(Arc::clone(entry.value()))
    }

    /// Every document, in slug order.
    pub fn load_all(&self) -> Result<Vec<Arc<Document>>, PageError> {
        self.slugs()?.iter().map(|slug| self.load(slug)).collect()
    }

    /// Number of documents loaded so far.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.starts_with('.') && !slug.contains(['/', '\\'])
}
