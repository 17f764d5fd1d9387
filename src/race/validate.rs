// src/race/validate.rs
// =============================================================================
// Checks that a race between two pages can be run at all, before spending
// any time searching.
//
// Rules, in order (the first failure wins):
// 1. Both pages exist
// 2. The start page links to at least one other wiki page
// 3. The end page is not marked as an orphan (nothing links to it)
// =============================================================================

use thiserror::Error;
use tracing::debug;

use crate::wiki::{extract_links, PageError, PageSource};

// Why a start/end pair was turned down
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("{} does not appear to be a valid wiki page.", .source.address())]
    Unreachable { source: PageError },

    #[error("{} could not be read as a wiki page.", .source.address())]
    Unparseable { source: PageError },

    #[error("Start page {address} is a dead-end page with no wiki links.")]
    UnwinnableStart { address: String },

    #[error("End page {address} is an orphan page with no wiki pages linking to it.")]
    UnreachableEnd { address: String },
}

impl From<PageError> for Rejection {
    fn from(source: PageError) -> Self {
        if source.is_parse() {
            Rejection::Unparseable { source }
        } else {
            Rejection::Unreachable { source }
        }
    }
}

// Validates a start/end pair
//
// Returns Ok(()) if the race can be run, otherwise the first rule that
// failed. Nothing is cached; the search fetches pages again.
pub async fn validate_pages<S>(source: &S, start: &str, end: &str) -> Result<(), Rejection>
where
    S: PageSource + ?Sized,
{
    for address in [start, end] {
        source.probe(address).await?;
    }

    let start_links = extract_links(source, start).await?;
    if start_links.is_empty() {
        return Err(Rejection::UnwinnableStart {
            address: start.to_string(),
        });
    }
    debug!(page = start, links = start_links.len(), "start page has links");

    if source.fetch(end).await?.is_orphaned() {
        return Err(Rejection::UnreachableEnd {
            address: end.to_string(),
        });
    }

    Ok(())
}
