//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (single-threaded, before any dispatch):
//!     Site::set_routes
//!     → Router::{around, get_root_html, get_wildcard_html, get_html, get}
//!     → RouteTable (patterns, handlers, middleware in order)
//!
//! Compilation:
//!     RouteTable → fold middleware around each handler → Dispatcher (immutable)
//!
//! Dispatch (shared by both substrates):
//!     url → exact pattern | wildcard | Unhandled
//!         → segments (≤ 1) → Context + page span
//!         → middleware chain → handler writes body
//!
//! Delivery:
//!     generate.rs: Requester::get → bytes in memory
//!     live.rs:     axum route → HTTP response
//! ```
//!
//! # Design Decisions
//! - One `Router` trait; substrates only provide the route table
//! - Duplicate patterns are rejected at registration, never at request time
//! - Middleware compose as an onion: first registered is outermost

pub mod context;
pub mod generate;
pub mod live;
pub mod middleware;
pub mod pattern;
pub mod router;

pub use context::{Context, PageError};
pub use generate::GenerateRouter;
pub use live::LiveRouter;
pub use middleware::Middleware;
pub use pattern::Pattern;
pub use router::{handler, Handler, Requester, Response, RouteError, RouteTable, Router, HTML};
