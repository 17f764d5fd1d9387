// src/race/mod.rs
// =============================================================================
// This module runs a wiki race: validate, resolve, search.
//
// Submodules:
// - validate: Can this race be won at all?
// - resolve: Which address does the end page really go by?
// - route: The route table (shortest known path to every discovered page)
// - search: The breadth-first search itself
//
// Everything here works against the PageSource trait, so it can be driven by
// the live WikiClient or by the in-memory wiki the tests use.
// =============================================================================

mod resolve;
mod route;
mod search;
mod validate;

#[cfg(test)]
mod fixtures;

use thiserror::Error;
use tracing::info;

use crate::wiki::{PageError, PageSource};

pub use resolve::resolve_redirect;
pub use search::{
    find_shortest_route, FailurePolicy, PathResult, SearchError, SearchOptions, SearchReport,
};
pub use validate::{validate_pages, Rejection};

// Everything the caller needs to report a finished race
#[derive(Debug, Clone)]
pub struct RaceOutcome {
    /// Start address as given
    pub start: String,
    /// End address as given
    pub end: String,
    /// Canonical end address the search looked for
    pub target: String,
    pub report: SearchReport,
}

#[derive(Debug, Error)]
pub enum RaceError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("could not resolve the end page: {0}")]
    Resolve(#[source] PageError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

// Runs one race from `start` to `end`
//
// Validation failures stop the race before any search cost is paid.
pub async fn run_race<S>(
    source: &S,
    start: &str,
    end: &str,
    options: &SearchOptions,
) -> Result<RaceOutcome, RaceError>
where
    S: PageSource + ?Sized,
{
    info!(start, end, "validating pages");
    validate_pages(source, start, end).await?;

    let target = resolve_redirect(source, end)
        .await
        .map_err(RaceError::Resolve)?;
    if target != end {
        info!(alias = end, canonical = %target, "end page redirects");
    }

    info!(concurrency = options.concurrency, "searching");
    let report = find_shortest_route(source, start, &target, options).await?;
    info!(
        hops = ?report.result.hops(),
        expanded = report.stats.pages_expanded,
        degraded = report.stats.pages_degraded,
        discovered = report.stats.pages_discovered,
        layers = report.stats.layers,
        "search finished"
    );

    Ok(RaceOutcome {
        start: start.to_string(),
        end: end.to_string(),
        target,
        report,
    })
}
