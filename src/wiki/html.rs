// src/wiki/html.rs
// =============================================================================
// This module reads the parts of a wiki page we care about out of its HTML.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Three questions get answered here:
// 1. Which wiki pages does the prose of this page link to?
// 2. Does the page declare a canonical address (is it an alias/redirect)?
// 3. Is the page marked as an orphan (nothing links to it)?
//
// Rust concepts:
// - Result<T, E>: For operations that can fail
// - Option<T>: For values that might be missing
// - Iterators and closures: For walking selected elements
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

use super::{LinkSet, PageError};

// Every article on the site lives under this path segment
const WIKI_PATH: &str = "/wiki/";

// Only links inside paragraphs count. Navigation bars, sidebars and
// infoboxes are not inside <p>, so they are skipped automatically.
const PROSE_LINKS: &str = "p a[href]";
const CANONICAL_LINK: &str = r#"link[rel~="canonical"][href]"#;
const ORPHAN_MARKER: &str = "div#orphaned";

// Builds a selector from one of the constants above
//
// The selectors are constants and known to be valid, so a failure here
// is a programmer error, not something a user can trigger.
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("constant CSS selector is valid")
}

// Returns the site origin of a page address: everything before "/wiki/"
//
// Example:
//   "https://qb.fandom.com/wiki/Tossup" -> "https://qb.fandom.com"
pub fn site_origin(page_url: &str) -> Result<&str, PageError> {
    page_url
        .find(WIKI_PATH)
        .map(|index| &page_url[..index])
        .ok_or_else(|| PageError::parse(page_url, "address has no /wiki/ segment"))
}

// Extracts the distinct wiki pages linked from the prose of a page
//
// Parameters:
//   html: the HTML content of the page
//   page_url: the address the page was fetched from (gives us the origin)
//
// Returns: LinkSet of absolute page addresses, in document order
pub fn extract_wiki_links(html: &str, page_url: &str) -> Result<LinkSet, PageError> {
    let origin = site_origin(page_url)?;
    let document = Html::parse_document(html);
    let prose_links = selector(PROSE_LINKS);

    let links = document
        .select(&prose_links)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_wiki_link(origin, href))
        .collect();

    Ok(links)
}

// Turns an href into a page address if it points at a page on the same site
//
// Examples (origin = "https://wiki.test"):
//   "/wiki/Bonus"                  -> Some("https://wiki.test/wiki/Bonus")
//   "https://wiki.test/wiki/Bonus" -> Some("https://wiki.test/wiki/Bonus")
//   "https://other.org/wiki/Bonus" -> None (different site)
//   "/w/index.php?title=Bonus"     -> None (not an article path)
//   "#cite_note-1"                 -> None
fn resolve_wiki_link(origin: &str, href: &str) -> Option<String> {
    if href.starts_with(WIKI_PATH) {
        return Some(format!("{origin}{href}"));
    }

    match href.strip_prefix(origin) {
        Some(rest) if rest.starts_with(WIKI_PATH) => Some(href.to_string()),
        _ => None,
    }
}

// Returns the canonical address declared by <link rel="canonical">, if any
//
// Absolute hrefs are returned exactly as written, and "/wiki/..." hrefs go
// through resolve_wiki_link, so both compare equal to the addresses
// extract_wiki_links builds. Any other relative form is joined onto the
// page address (and percent-encoded on the way).
pub fn canonical_link(html: &str, page_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let canonical = selector(CANONICAL_LINK);

    let href = document
        .select(&canonical)
        .filter_map(|link| link.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())?;

    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }

    if href.starts_with(WIKI_PATH) {
        return site_origin(page_url)
            .ok()
            .and_then(|origin| resolve_wiki_link(origin, href));
    }

    Url::parse(page_url)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .ok()
}

// True if the page carries the "orphaned page" maintenance banner
pub fn is_orphaned(html: &str) -> bool {
    let document = Html::parse_document(html);
    let marker = selector(ORPHAN_MARKER);
    // Bound to a local so the selection is dropped before `document`
    let found = document.select(&marker).next().is_some();
    found
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does "p a[href]" mean?
//    - It is a CSS descendant selector
//    - "every <a> with an href attribute that sits somewhere inside a <p>"
//    - That is how we keep to the prose of an article
//
// 2. What is [rel~="canonical"]?
//    - ~= matches one word in a space-separated attribute value
//    - So rel="canonical" and rel="alternate canonical" both match
//
// 3. Why filter_map?
//    - It maps and drops the None results in one step
//    - attr("href") and resolve_wiki_link both return Option
//
// 4. Why collect() straight into a LinkSet?
//    - LinkSet implements FromIterator<String>
//    - Duplicates are dropped on the way in, first occurrence wins
// -----------------------------------------------------------------------------
