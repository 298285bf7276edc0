//! Page rendering for the content site.
//!
//! HTML pages are maud layouts; the rendered markdown body is inserted
//! pre-escaped, every other piece of text is escaped by maud.

use std::io::Write;
use std::sync::Arc;

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::routing::{Context, PageError};
use crate::site::content::Document;
use crate::site::FEED_URL;

fn layout(site_title: &str, title: &str, main: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | " (site_title) }
                link rel="alternate" type="application/atom+xml" href=(FEED_URL);
            }
            body {
                header { a href="/" { (site_title) } }
                main { (main) }
            }
        }
    }
}

/// A single document page.
pub fn document(ctx: &mut Context, site_title: &str, doc: &Document) -> Result<(), PageError> {
    let page = layout(
        site_title,
        &doc.title,
        html! {
            article {
                h1 { (doc.title) }
                (PreEscaped(&doc.body))
            }
        },
    );
    ctx.write_str(&page.into_string());
    Ok(())
}

/// The index listing every document.
pub fn index(ctx: &mut Context, site_title: &str, docs: &[Arc<Document>]) -> Result<(), PageError> {
    let page = layout(
        site_title,
        "Index",
        html! {
            ul {
                @for doc in docs {
                    li { a href={ "/" (doc.slug) } { (doc.title) } }
                }
            }
        },
    );
    ctx.write_str(&page.into_string());
    Ok(())
}

// Atom needs self-closing `<link/>`, which maud does not emit, so the feed is
// written directly with maud's escaping for text.
fn xml_text(text: &str) -> String {
    html! { (text) }.into_string()
}

/// A minimal Atom feed of every document.
pub fn feed(
    ctx: &mut Context,
    site_title: &str,
    base_url: &str,
    docs: &[Arc<Document>],
) -> Result<(), PageError> {
    let base = xml_text(base_url.trim_end_matches('/'));
    write!(
        ctx,
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<feed xmlns=\"http://www.w3.org/2005/Atom\">\n\
         <title>{}</title>\n<id>{base}/</id>\n<link href=\"{base}/\"/>\n",
        xml_text(site_title),
    )?;
    for doc in docs {
        let link = format!("{base}/{}", xml_text(&doc.slug));
        write!(
            ctx,
            "<entry>\n<title>{}</title>\n<id>{link}</id>\n<link href=\"{link}\"/>\n<content type=\"html\">{}</content>\n</entry>\n",
            xml_text(&doc.title),
            xml_text(&doc.body),
        )?;
    }
    ctx.write_str("</feed>\n");
    Ok(())
}
