// src/race/resolve.rs
// =============================================================================
// Resolves the end page to its canonical address.
//
// A wiki page can be reachable under several names (redirects, aliases),
// but other pages link to its canonical name, which the page declares with
// <link rel="canonical">. The search compares links by exact string, so it
// has to look for the canonical name or it would walk straight past it.
// =============================================================================

use tracing::debug;

use crate::wiki::{PageError, PageSource};

// Returns the canonical address of `address`, or `address` itself if the
// page declares none
pub async fn resolve_redirect<S>(source: &S, address: &str) -> Result<String, PageError>
where
    S: PageSource + ?Sized,
{
    let page = source.fetch(address).await?;
    let canonical = page.canonical_address();
    debug!(page = page.address(), canonical = ?canonical, "resolved end page");
    Ok(canonical.unwrap_or_else(|| address.to_string()))
}
