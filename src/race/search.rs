// src/race/search.rs
// =============================================================================
// This module finds the shortest chain of links between two wiki pages.
//
// How it works (breadth-first search over a graph we discover as we go):
// 1. Start with the start page in the route table and in the frontier
// 2. Take the whole frontier as the current layer
// 3. Fetch every page of the layer and extract its links
// 4. For each link, in order:
//    - if it is the end page, we are done: route to the current page + link
//    - if we have never seen it, record its route and queue it for the
//      next layer
// 5. Repeat until the end page turns up or the frontier runs dry
//
// Concurrency:
// - Up to `concurrency` pages of a layer are fetched at the same time
// - Results are consumed strictly in frontier order by this one task, which
//   is the only writer of the route table
// - So the answer is exactly the one a one-page-at-a-time search would give,
//   and a later layer can never win over an earlier one
//
// Rust concepts:
// - VecDeque: First-in-first-out queue for the frontier
// - Streams: buffered() runs futures concurrently but yields in order
// - Enums as state machines: SearchState
// =============================================================================

use std::collections::VecDeque;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::route::RouteTable;
use crate::wiki::{extract_links, LinkSet, PageError, PageSource};

// What to do when a page can't be fetched or parsed in the middle of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Treat the page as having no links and keep searching
    #[default]
    Degrade,
    /// Stop the search with SearchError::Page
    Abort,
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Pages of one layer fetched at the same time (0 is treated as 1)
    pub concurrency: usize,
    /// Wall-clock budget for the whole search
    pub deadline: Option<Duration>,
    /// Maximum number of hops to explore
    pub max_depth: Option<usize>,
    pub failure_policy: FailurePolicy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            deadline: None,
            max_depth: None,
            failure_policy: FailurePolicy::Degrade,
        }
    }
}

// The answer to one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResult {
    /// Pages from start to end, both included
    Found(Vec<String>),
    NotFound,
}

impl PathResult {
    pub fn path(&self) -> Option<&[String]> {
        match self {
            PathResult::Found(path) => Some(path),
            PathResult::NotFound => None,
        }
    }

    /// Number of links followed (one less than the number of pages)
    pub fn hops(&self) -> Option<usize> {
        self.path().map(|path| path.len().saturating_sub(1))
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Pages whose links were read successfully
    pub pages_expanded: usize,
    /// Pages that failed and were treated as dead ends
    pub pages_degraded: usize,
    /// Pages that got a route, start included
    pub pages_discovered: usize,
    /// Layers (hop distances) taken out of the frontier
    pub layers: usize,
}

#[derive(Debug, Clone)]
pub struct SearchReport {
    pub result: PathResult,
    pub stats: SearchStats,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("search stopped at {address}: {source}")]
    Page { address: String, source: PageError },
}

// Expanding -> Found | Exhausted. Found and Exhausted are terminal.
#[derive(Debug)]
enum SearchState {
    Expanding,
    Found(Vec<String>),
    Exhausted,
}

// Finds the shortest chain of links from `start` to `end`
//
// `end` must already be canonical (see resolve.rs): pages only ever link to
// canonical addresses, so an alias would never be matched.
//
// start == end is answered with the single-page path [start] without
// fetching anything.
pub async fn find_shortest_route<S>(
    source: &S,
    start: &str,
    end: &str,
    options: &SearchOptions,
) -> Result<SearchReport, SearchError>
where
    S: PageSource + ?Sized,
{
    let mut traversal = Traversal::new(source, start, end, options);
    let mut state = if start == end {
        debug!(page = start, "start page is the end page");
        SearchState::Found(vec![start.to_string()])
    } else {
        SearchState::Expanding
    };

    loop {
        state = match state {
            SearchState::Expanding => traversal.step().await?,
            SearchState::Found(path) => return Ok(traversal.finish(PathResult::Found(path))),
            SearchState::Exhausted => return Ok(traversal.finish(PathResult::NotFound)),
        };
    }
}

// Everything one search owns. Dropped when the search returns.
struct Traversal<'a, S: ?Sized> {
    source: &'a S,
    end: &'a str,
    options: &'a SearchOptions,
    deadline: Option<Instant>,
    routes: RouteTable,
    frontier: VecDeque<String>,
    stats: SearchStats,
}

impl<'a, S> Traversal<'a, S>
where
    S: PageSource + ?Sized,
{
    fn new(source: &'a S, start: &str, end: &'a str, options: &'a SearchOptions) -> Self {
        Self {
            source,
            end,
            options,
            deadline: options.deadline.map(|limit| Instant::now() + limit),
            routes: RouteTable::new(start),
            frontier: VecDeque::from([start.to_string()]),
            stats: SearchStats::default(),
        }
    }

    fn finish(&self, result: PathResult) -> SearchReport {
        let mut stats = self.stats.clone();
        stats.pages_discovered = self.routes.len();
        SearchReport { result, stats }
    }

    // One transition out of Expanding
    async fn step(&mut self) -> Result<SearchState, SearchError> {
        if self.frontier.is_empty() {
            return Ok(SearchState::Exhausted);
        }
        if let Some(max_depth) = self.options.max_depth {
            if self.stats.layers >= max_depth {
                info!(max_depth, "depth limit reached");
                return Ok(SearchState::Exhausted);
            }
        }

        let layer: Vec<String> = self.frontier.drain(..).collect();
        self.stats.layers += 1;
        info!(layer = self.stats.layers, pages = layer.len(), "expanding layer");
        self.expand_layer(&layer).await
    }

    async fn expand_layer(&mut self, layer: &[String]) -> Result<SearchState, SearchError> {
        let source = self.source;
        let deadline = self.deadline;
        let limit = self.options.deadline.unwrap_or_default();

        // buffered() keeps up to N fetches in flight and yields them in
        // layer order; dropping the stream cancels whatever is left
        let mut expansions = stream::iter(layer.iter().map(move |current| async move {
            let links = with_deadline(deadline, limit, extract_links(source, current)).await;
            (current, links)
        }))
        .buffered(self.options.concurrency.max(1));

        while let Some((current, links)) = expansions.next().await {
            let links = match links? {
                Ok(links) => {
                    self.stats.pages_expanded += 1;
                    debug!(page = %current, links = links.len(), "expanded page");
                    links
                }
                Err(error) => self.absorb_failure(current, error)?,
            };

            for link in &links {
                if link.as_str() == self.end {
                    return Ok(SearchState::Found(self.routes.route_via(current, link)));
                }
                // current is always routed, so discover() alone would also
                // reject a self-link
                if link != current && self.routes.discover(current, link) {
                    self.frontier.push_back(link.clone());
                }
            }
        }

        Ok(SearchState::Expanding)
    }

    // Applies the failure policy to a page that could not be expanded
    fn absorb_failure(&mut self, address: &str, error: PageError) -> Result<LinkSet, SearchError> {
        match self.options.failure_policy {
            FailurePolicy::Degrade => {
                warn!(page = address, %error, "treating page as a dead end");
                self.stats.pages_degraded += 1;
                Ok(LinkSet::new())
            }
            FailurePolicy::Abort => Err(SearchError::Page {
                address: address.to_string(),
                source: error,
            }),
        }
    }
}

// Runs a fetch against the search deadline, if there is one
async fn with_deadline<F, T>(
    deadline: Option<Instant>,
    limit: Duration,
    fetch: F,
) -> Result<T, SearchError>
where
    F: std::future::Future<Output = T>,
{
    match deadline {
        Some(at) => tokio::time::timeout_at(at, fetch)
            .await
            .map_err(|_| SearchError::DeadlineExceeded(limit)),
        None => Ok(fetch.await),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why process the frontier a whole layer at a time?
//    - Every page in a layer is the same number of hops from the start
//    - Finishing a layer before starting the next is what makes the first
//      match the shortest one, even with several fetches in flight
//
// 2. buffered() vs buffer_unordered()
//    - buffer_unordered(N) yields results as they complete
//    - buffered(N) yields them in the order the futures were created
//    - We need the order: it decides ties between equally short paths
//
// 3. Why is the state machine a loop over an enum?
//    - Each arm returns the next state, so there is no hidden early exit
//    - Found and Exhausted return from the function; Expanding loops again
//
// 4. What does ?Sized mean on S?
//    - It lets S be a trait object, so `&dyn PageSource` works as well
// -----------------------------------------------------------------------------
