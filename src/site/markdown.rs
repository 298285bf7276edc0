//! Markdown to HTML.

use pulldown_cmark::{html::push_html, Options, Parser};

/// Render a markdown source to an HTML fragment.
///
/// GFM tables, strikethrough and task lists are enabled. Raw HTML blocks pass
/// through unchanged.
pub fn render_markdown(source: &str) -> String {
    let options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(source, options);

    let mut html = String::with_capacity(source.len() * 2);
    push_html(&mut html, parser);
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_and_block_markup() {
        let html = render_markdown("Some *emphasis* and `code`.\n\n- one\n- two\n");
        assert!(html.contains("<p>Some <em>emphasis</em> and <code>code</code>.</p>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn test_tables_and_raw_html() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n<div class=\"note\">kept</div>\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<div class=\"note\">kept</div>"));
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(render_markdown("a < b & c"), "<p>a &lt; b &amp; c</p>\n");
    }
}
