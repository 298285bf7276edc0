//! Build scheduling subsystem.
//!
//! # Data Flow
//! ```text
//! Router::static_urls + Site::wildcard_urls
//!     → tracker.rs (all urls, minus dependent markers)
//!     → independent urls → pool.rs batch #1 → wait
//!     → dependent urls   → pool.rs batch #2 → wait
//! ```
//!
//! # Design Decisions
//! - The phase split is a barrier, not a dependency graph
//! - Each batch gets a fresh pool; task errors stay on their tasks

pub mod pool;
pub mod tracker;

pub use pool::{Pool, Task, TaskError, Work};
pub use tracker::{Tracker, TrackerError, WildcardUrls};
