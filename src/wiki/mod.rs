// src/wiki/mod.rs
// =============================================================================
// This module contains everything that touches a single wiki page.
//
// Submodules:
// - error: What can go wrong fetching or reading a page
// - page: A fetched page and its LinkSet
// - html: Reading links, canonical address and orphan marker out of HTML
// - source: The PageSource trait and the link extractor built on it
// - http: WikiClient, the PageSource that talks to a real site
//
// Nothing in here knows about searching. It answers "what does this one
// page link to?" and the race module builds the graph from those answers.
// =============================================================================

mod error;
mod html;
mod http;
mod page;
mod source;

pub use error::{FetchFailure, PageError};
pub use http::{ClientConfig, WikiClient};
pub use page::{LinkSet, WikiPage};
pub use source::{extract_links, PageSource};
