//! Route patterns and URL decomposition.
//!
//! # Responsibilities
//! - Distinguish the root, wildcard and literal route keys
//! - Split a request URL into path segments
//! - Enforce the single-segment URL limit
//!
//! # Design Decisions
//! - A literal `"/"` (or empty string) is the root pattern, so it can only be registered once
//! - `"about"` and `"/about"` are one page: literals are stored in canonical form
//! - Lookup is exact equality on the canonical form; the wildcard is a fallback, never a glob
//! - More than one segment is rejected at dispatch, not at registration

use std::fmt;

use crate::routing::context::PageError;

/// Maximum number of non-empty path segments a URL may carry.
pub const MAX_SEGMENTS: usize = 1;

/// A registered route key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// The site root, `/`.
    Root,
    /// Fallback for any URL without an exact match.
    Wildcard,
    /// An exact path in canonical form, such as `/about` or `/feed.xml`.
    Literal(String),
}

impl Pattern {
    /// Build a pattern from a literal path. `"/"` and `""` map to [`Pattern::Root`].
    pub fn literal(path: impl AsRef<str>) -> Self {
        let path = canonical_url(path.as_ref());
        if path == "/" {
            Pattern::Root
        } else {
            Pattern::Literal(path)
        }
    }

    /// The URL this pattern stands for, or `None` for the wildcard.
    pub fn url(&self) -> Option<&str> {
        match self {
            Pattern::Root => Some("/"),
            Pattern::Wildcard => None,
            Pattern::Literal(path) => Some(path),
        }
    }

    /// Path used when mounting this pattern on an HTTP router.
    pub(crate) fn mount_path(&self) -> Option<String> {
        match self {
            Pattern::Literal(path) => Some(path.clone()),
            _ => None,
        }
    }
}

/// The one spelling of `url` used for route keys and URL bookkeeping:
/// exactly one leading `/`.
pub fn canonical_url(url: &str) -> String {
    format!("/{}", url.trim_start_matches('/'))
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Root => write!(f, "/"),
            Pattern::Wildcard => write!(f, "*"),
            Pattern::Literal(path) => write!(f, "{path}"),
        }
    }
}

/// Split a URL on `/`, dropping empty segments.
///
/// Fails when the URL has more than [`MAX_SEGMENTS`] segments.
pub fn segments(url: &str) -> Result<Vec<String>, PageError> {
    let parts: Vec<String> = url
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();

    if parts.len() > MAX_SEGMENTS {
        return Err(PageError::MalformedUrl {
            url: url.to_owned(),
            reason: format!("{} path segments, at most {MAX_SEGMENTS} supported", parts.len()),
        });
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_literal_is_root() {
        assert_eq!(Pattern::literal("/"), Pattern::Root);
        assert_eq!(Pattern::literal(""), Pattern::Root);
        assert_eq!(Pattern::literal("/about"), Pattern::Literal("/about".into()));
    }

    #[test]
    fn test_literal_spellings_are_one_pattern() {
        assert_eq!(Pattern::literal("about"), Pattern::literal("/about"));
        assert_eq!(Pattern::literal("//about"), Pattern::literal("/about"));
        assert_eq!(Pattern::literal("feed.xml").url(), Some("/feed.xml"));
        assert_eq!(canonical_url(""), "/");
        assert_eq!(canonical_url("one"), "/one");
    }

    #[test]
    fn test_mount_path() {
        assert_eq!(Pattern::literal("feed.xml").mount_path().as_deref(), Some("/feed.xml"));
        assert_eq!(Pattern::literal("/about").mount_path().as_deref(), Some("/about"));
        assert_eq!(Pattern::Root.mount_path(), None);
        assert_eq!(Pattern::Wildcard.mount_path(), None);
    }

    #[test]
    fn test_segments() {
        assert!(segments("/").unwrap().is_empty());
        assert_eq!(segments("/about").unwrap(), vec!["about"]);
        assert_eq!(segments("one").unwrap(), vec!["one"]);
        assert_eq!(segments("//about//").unwrap(), vec!["about"]);
    }

    #[test]
    fn test_too_many_segments() {
        let err = segments("/blog/post").unwrap_err();
        assert!(matches!(err, PageError::MalformedUrl { .. }));
        assert!(err.to_string().contains("/blog/post"));
    }
}
