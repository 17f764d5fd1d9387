// src/wiki/page.rs
// =============================================================================
// A fetched wiki page and the set of links found on it.
//
// WikiPage keeps the raw HTML as a String. scraper's parsed document is not
// Send, so we parse on demand inside plain (non-async) methods and never
// hold a parsed document across an .await.
// =============================================================================

use std::collections::HashSet;

use super::html;
use super::PageError;

#[derive(Debug, Clone)]
pub struct WikiPage {
    address: String,
    html: String,
}

impl WikiPage {
    pub fn new(address: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            html: html.into(),
        }
    }

    /// The address the page was requested under
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Distinct same-site pages linked from the page's prose
    pub fn links(&self) -> Result<LinkSet, PageError> {
        html::extract_wiki_links(&self.html, &self.address)
    }

    /// The address declared by `<link rel="canonical">`, if the page has one
    pub fn canonical_address(&self) -> Option<String> {
        html::canonical_link(&self.html, &self.address)
    }

    /// True if the page is marked as having no inbound links
    pub fn is_orphaned(&self) -> bool {
        html::is_orphaned(&self.html)
    }
}

// Deduplicated page addresses, iterated in the order they were first seen
//
// The order is what the search uses to break ties between equally short
// paths, so it has to be deterministic for a given page.
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an address, returning false if it was already present
    pub fn insert(&mut self, address: String) -> bool {
        if self.contains(&address) {
            return false;
        }
        self.seen.insert(address.clone());
        self.ordered.push(address);
        true
    }

    pub fn contains(&self, address: &str) -> bool {
        self.seen.contains(address)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.ordered.iter()
    }
}

impl FromIterator<String> for LinkSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut links = LinkSet::new();
        for address in iter {
            links.insert(address);
        }
        links
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_set_keeps_first_occurrence_order() {
        let links: LinkSet = ["b", "a", "b", "c", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        let order: Vec<&str> = links.iter().map(String::as_str).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_link_set_insert_reports_duplicates() {
        let mut links = LinkSet::new();
        assert!(links.insert("a".to_string()));
        assert!(!links.insert("a".to_string()));
        assert!(links.contains("a"));
        assert!(!links.contains("b"));
    }

    #[test]
    fn test_page_reads_links_and_markers() {
        let page = WikiPage::new(
            "https://wiki.test/wiki/Alias",
            r#"<html><head><link rel="canonical" href="https://wiki.test/wiki/Real"></head>
               <body><div id="orphaned"></div><p><a href="/wiki/Other">o</a></p></body></html>"#,
        );
        assert_eq!(page.address(), "https://wiki.test/wiki/Alias");
        assert!(page.links().unwrap().contains("https://wiki.test/wiki/Other"));
        assert_eq!(
            page.canonical_address().as_deref(),
            Some("https://wiki.test/wiki/Real")
        );
        assert!(page.is_orphaned());
    }
}
