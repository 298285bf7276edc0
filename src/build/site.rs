//! The route-registration collaborator.

use std::sync::Arc;

use crate::routing::{RouteError, Router};
use crate::schedule::Tracker;
use crate::BoxError;

/// An application whose pages the orchestrator builds or hosts.
///
/// The same registration code runs against the generate and live routers.
pub trait Site: Send + Sync + 'static {
    /// Register handlers on `router` and mark aggregate pages as dependent.
    fn set_routes(&self, router: &mut dyn Router, tracker: &mut Tracker) -> Result<(), RouteError>;

    /// URLs served by the wildcard handler, e.g. one per content item.
    fn wildcard_urls(&self) -> Result<Vec<String>, BoxError>;
}

/// A tracker whose wildcard expansion is delegated to `site`.
pub fn tracker_for(site: &Arc<dyn Site>) -> Tracker {
    let site = Arc::clone(site);
    Tracker::new(Arc::new(move || site.wildcard_urls()))
}
