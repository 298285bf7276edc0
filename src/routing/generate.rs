//! In-memory substrate used for static generation.
//!
//! Pages are rendered by calling handlers directly through a [`Requester`];
//! nothing touches the network.
//!
//! [`Requester`]: crate::routing::Requester

use crate::routing::router::{RouteTable, Router};

/// Router whose pages are captured as bytes.
#[derive(Default)]
pub struct GenerateRouter {
    table: RouteTable,
}

impl GenerateRouter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Router for GenerateRouter {
    fn table(&self) -> &RouteTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut RouteTable {
        &mut self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::context::PageError;
    use crate::routing::middleware::from_fn;
    use crate::routing::pattern::Pattern;
    use crate::routing::router::{handler, RouteError, HTML};
    use std::sync::{Arc, Mutex};

    fn literal(body: &'static str) -> crate::routing::Handler {
        handler(move |ctx| {
            ctx.write_str(body);
            Ok(())
        })
    }

    #[test]
    fn test_exact_then_wildcard() {
        let mut router = GenerateRouter::new();
        router.get_root_html(literal("root")).unwrap();
        router.get_html("/about", literal("about")).unwrap();
        router
            .get_wildcard_html(handler(|ctx| {
                let slug = ctx.segment().unwrap_or_default().to_owned();
                ctx.write_str(&format!("item {slug}"));
                Ok(())
            }))
            .unwrap();

        let requester = router.requester();
        assert_eq!(requester.get("/").unwrap(), b"root");
        assert_eq!(requester.get("/about").unwrap(), b"about");
        assert_eq!(requester.get("one").unwrap(), b"item one");
        assert_eq!(requester.get("/two").unwrap(), b"item two");
    }

    #[test]
    fn test_unhandled_without_wildcard() {
        let mut router = GenerateRouter::new();
        router.get_html("/about", literal("about")).unwrap();

        let err = router.requester().get("/missing").unwrap_err();
        assert!(matches!(err, PageError::Unhandled { ref url } if url == "/missing"));
    }

    #[test]
    fn test_duplicate_registration_fails_fast() {
        let mut router = GenerateRouter::new();
        router.get_html("/about", literal("a")).unwrap();
        let err = router.get_html("/about", literal("b")).unwrap_err();
        assert!(matches!(err, RouteError::Duplicate(Pattern::Literal(ref p)) if p == "/about"));

        router.get_root_html(literal("root")).unwrap();
        assert!(matches!(
            router.get_html("/", literal("again")),
            Err(RouteError::Duplicate(Pattern::Root))
        ));

        router.get_wildcard_html(literal("w")).unwrap();
        assert!(router.get_wildcard_html(literal("w")).is_err());

        // The first registration is still the one served.
        assert_eq!(router.requester().get("/about").unwrap(), b"a");
    }

    #[test]
    fn test_slash_spellings_are_one_route() {
        let mut router = GenerateRouter::new();
        router.get_html("/about", literal("a")).unwrap();
        let err = router.get_html("about", literal("b")).unwrap_err();
        assert!(matches!(err, RouteError::Duplicate(Pattern::Literal(ref p)) if p == "/about"));

        let requester = router.requester();
        assert_eq!(requester.get("/about").unwrap(), b"a");
        assert_eq!(requester.get("about").unwrap(), b"a");
    }

    #[test]
    fn test_invalid_literal_pattern() {
        let mut router = GenerateRouter::new();
        assert!(matches!(
            router.get_html("/{slug}", literal("x")),
            Err(RouteError::InvalidPattern { .. })
        ));
        assert!(matches!(
            router.get_html("/:draft", literal("x")),
            Err(RouteError::InvalidPattern { .. })
        ));
        router.get_html("notes:draft", literal("x")).unwrap();
    }

    #[test]
    fn test_static_urls_exclude_wildcard() {
        let mut router = GenerateRouter::new();
        router.get_root_html(literal("root")).unwrap();
        router.get_wildcard_html(literal("w")).unwrap();
        router.get_html("/about", literal("about")).unwrap();
        router.get("feed.xml", "application/atom+xml", literal("<feed/>")).unwrap();

        assert_eq!(router.static_urls(), vec!["/", "/about", "/feed.xml"]);
    }

    #[test]
    fn test_malformed_url_does_not_poison_later_dispatches() {
        let mut router = GenerateRouter::new();
        router.get_wildcard_html(literal("ok")).unwrap();
        let requester = router.requester();

        assert!(matches!(
            requester.get("/a/b"),
            Err(PageError::MalformedUrl { .. })
        ));
        assert_eq!(requester.get("/a").unwrap(), b"ok");
    }

    #[test]
    fn test_content_type_follows_route() {
        let mut router = GenerateRouter::new();
        router.get("feed.xml", "application/atom+xml", literal("<feed/>")).unwrap();
        router.get_root_html(literal("root")).unwrap();

        let requester = router.requester();
        assert_eq!(requester.dispatch("feed.xml").unwrap().content_type, "application/atom+xml");
        assert_eq!(requester.dispatch("/").unwrap().content_type, HTML);
    }

    #[test]
    fn test_three_stacked_middleware() {
        let log = Arc::new(Mutex::new(Vec::<String>::new()));
        let mut router = GenerateRouter::new();
        for name in ["A", "B", "C"] {
            let log = Arc::clone(&log);
            router.around(from_fn(move |ctx, next| {
                log.lock().unwrap().push(format!("{name}-before"));
                next(ctx)?;
                log.lock().unwrap().push(format!("{name}-after"));
                Ok(())
            }));
        }
        let inner = Arc::clone(&log);
        router
            .get_root_html(handler(move |_ctx| {
                inner.lock().unwrap().push("handler".into());
                Ok(())
            }))
            .unwrap();

        router.requester().get("/").unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "A-before", "B-before", "C-before", "handler", "C-after", "B-after", "A-after"
            ]
        );
    }

    #[test]
    fn test_handler_error_propagates_unchanged() {
        let mut router = GenerateRouter::new();
        router
            .get_root_html(handler(|_ctx| Err(PageError::NotFound("gone".into()))))
            .unwrap();
        let err = router.requester().get("/").unwrap_err();
        assert_eq!(err.to_string(), "not found: gone");
    }
}
