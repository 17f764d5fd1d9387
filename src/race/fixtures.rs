// src/race/fixtures.rs
// =============================================================================
// An in-memory wiki for tests.
//
// Pages are described as "name -> links" and rendered to real HTML on every
// fetch, so tests exercise the same parser the live client uses. Every
// fetch and probe is counted so tests can check how often a page was
// expanded.
// =============================================================================

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::wiki::{FetchFailure, PageError, PageSource, WikiPage};

pub const ORIGIN: &str = "https://wiki.test";

// Full address of a page on the test wiki
pub fn addr(name: &str) -> String {
    format!("{ORIGIN}/wiki/{name}")
}

#[derive(Debug, Clone, Default)]
struct FixturePage {
    links: Vec<String>,
    canonical: Option<String>,
    orphaned: bool,
    delay: Option<Duration>,
}

impl FixturePage {
    fn render(&self) -> String {
        let head = self
            .canonical
            .as_ref()
            .map(|target| format!(r#"<link rel="canonical" href="/wiki/{target}">"#))
            .unwrap_or_default();
        let marker = if self.orphaned {
            r#"<div id="orphaned">This page is an orphan.</div>"#
        } else {
            ""
        };
        let prose: String = self
            .links
            .iter()
            .map(|name| format!(r#"<a href="/wiki/{name}">{name}</a> "#))
            .collect();

        // The nav link sits outside <p> and must never show up as an edge
        format!(
            r#"<html><head>{head}</head><body>{marker}<nav><a href="/wiki/Main_Page">Home</a></nav><p>{prose}</p></body></html>"#
        )
    }
}

#[derive(Debug, Default)]
pub struct MemoryWiki {
    pages: HashMap<String, FixturePage>,
    failures: HashMap<String, PageError>,
    fetch_failures: HashMap<String, PageError>,
    fetches: Mutex<HashMap<String, usize>>,
    probes: Mutex<HashMap<String, usize>>,
}

impl MemoryWiki {
    pub fn new() -> Self {
        Self::default()
    }

    // Builds a wiki from an adjacency list. Link targets that are not
    // listed themselves become pages with no links.
    pub fn from_edges(edges: &[(&str, &[&str])]) -> Self {
        let mut wiki = Self::new();
        for (name, links) in edges {
            wiki = wiki.page(name, links);
        }
        let targets: Vec<String> = edges
            .iter()
            .flat_map(|(_, links)| links.iter())
            .map(|name| addr(name))
            .collect();
        for target in targets {
            wiki.pages.entry(target).or_default();
        }
        wiki
    }

    pub fn page(mut self, name: &str, links: &[&str]) -> Self {
        let page = self.pages.entry(addr(name)).or_default();
        page.links = links.iter().map(|link| link.to_string()).collect();
        self
    }

    // A page whose canonical address is another page
    pub fn alias(mut self, name: &str, canonical: &str) -> Self {
        self.pages.entry(addr(name)).or_default().canonical = Some(canonical.to_string());
        self
    }

    pub fn orphan(mut self, name: &str) -> Self {
        self.pages.entry(addr(name)).or_default().orphaned = true;
        self
    }

    pub fn slow(mut self, name: &str, delay: Duration) -> Self {
        self.pages.entry(addr(name)).or_default().delay = Some(delay);
        self
    }

    // Every probe and fetch of this page fails with `error`
    pub fn failing(mut self, name: &str, error: PageError) -> Self {
        self.failures.insert(addr(name), error);
        self
    }

    // The page exists, but fetching its content fails with `error`
    pub fn failing_fetch(mut self, name: &str, error: PageError) -> Self {
        self.fetch_failures.insert(addr(name), error);
        self
    }

    pub fn fetch_count(&self, name: &str) -> usize {
        let fetches = self.fetches.lock().unwrap();
        fetches.get(&addr(name)).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }

    pub fn total_probes(&self) -> usize {
        self.probes.lock().unwrap().values().sum()
    }

    fn lookup(&self, address: &str) -> Result<&FixturePage, PageError> {
        if let Some(error) = self.failures.get(address) {
            return Err(error.clone());
        }
        self.pages.get(address).ok_or_else(|| PageError::Unreachable {
            address: address.to_string(),
            failure: FetchFailure::Status(404),
        })
    }
}

#[async_trait]
impl PageSource for MemoryWiki {
    async fn probe(&self, address: &str) -> Result<(), PageError> {
        *self
            .probes
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_default() += 1;
        self.lookup(address).map(|_| ())
    }

    async fn fetch(&self, address: &str) -> Result<WikiPage, PageError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_default() += 1;

        if let Some(error) = self.fetch_failures.get(address) {
            return Err(error.clone());
        }
        let page = self.lookup(address)?.clone();
        if let Some(delay) = page.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(WikiPage::new(address, page.render()))
    }
}
