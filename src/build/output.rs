//! Mapping of page URLs to files under the output root.

use std::path::{Path, PathBuf};

use crate::routing::pattern;
use crate::routing::PageError;

/// File name used for the root URL.
pub const INDEX_FILE: &str = "index";

/// Path of the file `url` is written to.
///
/// The root maps to [`INDEX_FILE`], every other URL to its single path
/// segment. Names that would leave the output root are rejected.
pub fn page_path(root: &Path, url: &str) -> Result<PathBuf, PageError> {
    let segments = pattern::segments(url)?;
    match segments.as_slice() {
        [] => Ok(root.join(INDEX_FILE)),
        [name] if name != "." && name != ".." && !name.contains('\\') => Ok(root.join(name)),
        _ => Err(PageError::MalformedUrl {
            url: url.to_owned(),
            reason: "not a valid output file name".to_owned(),
        }),
    }
}
