// src/wiki/source.rs
// =============================================================================
// The seam between the race logic and the network.
//
// Validation, redirect resolution and the search only ever talk to a
// PageSource. In the real program that is WikiClient (HTTP). In tests it is
// an in-memory wiki, so the search can be checked on hand-built graphs.
// =============================================================================

use async_trait::async_trait;

use super::{LinkSet, PageError, WikiPage};

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Lightweight existence check, no body needed
    async fn probe(&self, address: &str) -> Result<(), PageError>;

    /// Fetches the full page
    async fn fetch(&self, address: &str) -> Result<WikiPage, PageError>;
}

// The link extractor: one fetch, one parse, no state kept between calls
pub async fn extract_links<S>(source: &S, address: &str) -> Result<LinkSet, PageError>
where
    S: PageSource + ?Sized,
{
    source.fetch(address).await?.links()
}
