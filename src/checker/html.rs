// src/checker/html.rs
// =============================================================================
// This module extracts link targets from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Unlike a plain link checker we return the raw href values. Deciding what a
// relative link means (and whether it should be followed) is the crawler's
// job, because it resolves links against the configured domain.
//
// Rust concepts:
// - Iterators: filter_map + collect instead of a manual loop
// =============================================================================

use scraper::{Html, Selector};

// "a[href]" means "all <a> tags that have an href attribute"
//
// Selector::parse can only fail on an invalid selector. This one is a
// constant, so a failure would be a programmer error.
fn anchor_selector() -> Selector {
    Selector::parse("a[href]").expect("a[href] is a valid selector")
}

// Returns the href of every anchor, in document order
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href='https://x.org'>X</a>"
//   result = ["/docs", "https://x.org"]
pub fn extract_anchor_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = anchor_selector();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_order_and_raw_values() {
        let html = r#"
            <nav><a href="/docs">Docs</a></nav>
            <main>
                <a href="https://www.rust-lang.org">Rust</a>
                <a href="about">About</a>
                <a name="anchor-without-href">Nothing</a>
                <a href="mailto:test@example.com">Email</a>
            </main>
        "#;

        assert_eq!(
            extract_anchor_hrefs(html),
            vec!["/docs", "https://www.rust-lang.org", "about", "mailto:test@example.com"]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let html = r#"<a href="/x">1</a><a href="/x">2</a>"#;
        assert_eq!(extract_anchor_hrefs(html), vec!["/x", "/x"]);
    }

    #[test]
    fn test_no_anchors() {
        assert!(extract_anchor_hrefs("<p>plain text</p>").is_empty());
    }
}
