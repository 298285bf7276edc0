//! Page middleware.
//!
//! A middleware is a decorator: it receives the next handler in the chain and
//! returns a handler wrapping it. The router keeps middleware in registration
//! order and folds them right-to-left when the route table is compiled, so the
//! first registered middleware is outermost on entry and innermost on exit:
//!
//! ```text
//! [A, B] around h  =>  A-before → B-before → h → B-after → A-after
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::routing::context::{Context, PageError};
use crate::routing::router::Handler;

/// A handler decorator.
pub type Middleware = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

/// Build a middleware from a closure receiving the context and the next handler.
///
/// The closure decides whether and when to call `next`; returning an error
/// short-circuits the rest of the chain.
pub fn from_fn<F>(f: F) -> Middleware
where
    F: Fn(&mut Context, &Handler) -> Result<(), PageError> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    Arc::new(move |next: Handler| -> Handler {
        let f = Arc::clone(&f);
        Arc::new(move |ctx: &mut Context| f(ctx, &next))
    })
}

/// Wrap `handler` in `middleware`, first element outermost.
pub fn compose(middleware: &[Middleware], handler: Handler) -> Handler {
    middleware
        .iter()
        .rev()
        .fold(handler, |next, wrap| wrap(next))
}

/// Log every dispatch with its outcome and duration.
pub fn trace_pages() -> Middleware {
    from_fn(|ctx, next| {
        let start = Instant::now();
        let result = next(ctx);
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => tracing::debug!(bytes = ctx.body().len(), elapsed_ms, "Page rendered"),
            Err(e) => tracing::warn!(error = %e, elapsed_ms, "Page failed"),
        }
        result
    })
}
