//! Per-page request context.
//!
//! A [`Context`] is built once per dispatch, in memory for generation and per
//! inbound request when hosting. Handlers read the URL and its segments from
//! it and write the page body into it.

use std::io;

use thiserror::Error;
use tracing::Span;

use crate::BoxError;

/// Errors produced while dispatching a single page.
#[derive(Debug, Error)]
pub enum PageError {
    /// No pattern matched and no wildcard handler is registered.
    #[error("unhandled url: {url}")]
    Unhandled { url: String },

    /// The URL cannot be served or written (too many segments, unsafe file name).
    #[error("malformed url {url}: {reason}")]
    MalformedUrl { url: String, reason: String },

    /// The handler recognised the URL but has nothing to serve for it.
    #[error("not found: {0}")]
    NotFound(String),

    /// The handler failed to produce its output.
    #[error("render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Other(#[from] BoxError),
}

/// Request-scoped state handed to handlers and middleware.
#[derive(Debug)]
pub struct Context {
    url: String,
    segments: Vec<String>,
    span: Span,
    content_type: String,
    body: Vec<u8>,
}

impl Context {
    pub(crate) fn new(url: &str, segments: Vec<String>, span: Span, content_type: &str) -> Self {
        Self {
            url: url.to_owned(),
            segments,
            span,
            content_type: content_type.to_owned(),
            body: Vec::new(),
        }
    }

    /// The URL being rendered, exactly as it was requested.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Non-empty path segments of the URL.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The single path segment, if any. `None` for the root URL.
    pub fn segment(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Logger for this page. Events recorded inside it carry the page URL.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// MIME type of the route serving this page.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Append bytes to the response.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// Append text to the response.
    pub fn write_str(&mut self, text: &str) {
        self.body.extend_from_slice(text.as_bytes());
    }

    /// Bytes written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn into_body(self) -> Vec<u8> {
        self.body
    }
}

impl io::Write for Context {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
