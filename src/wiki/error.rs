// src/wiki/error.rs
// =============================================================================
// Errors that can happen while fetching or reading a single wiki page.
//
// Two families matter to the rest of the program:
// - Unreachable: the page could not be fetched at all (network, DNS, TLS,
//   timeout, non-success HTTP status)
// - Parse: the page was fetched but is not the document shape we expect
//
// The validator turns these into hard rejections. The search engine decides
// per its FailurePolicy whether they sink the search or only that one page.
//
// Rust concepts:
// - thiserror: derive std::error::Error and Display from attributes
// =============================================================================

use thiserror::Error;

// Why a fetch did not complete
//
// Mirrors the categories a browser would show you: a bad status code,
// a timeout, a redirect loop, a DNS or certificate problem, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// Server answered with a non-success status code
    #[error("HTTP {0}")]
    Status(u16),
    /// Request timed out
    #[error("request timed out")]
    Timeout,
    /// Redirect loop or redirect limit reached
    #[error("too many redirects")]
    TooManyRedirects,
    /// Could not resolve hostname
    #[error("could not resolve hostname")]
    Dns,
    /// SSL/TLS certificate error
    #[error("SSL certificate error")]
    Tls,
    /// Connection refused, reset, etc.
    #[error("connection failed")]
    Connection,
    /// Anything else reqwest reported
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("{address} is not a valid page address: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("{address} is unreachable: {failure}")]
    Unreachable {
        address: String,
        failure: FetchFailure,
    },

    #[error("{address} could not be parsed: {reason}")]
    Parse { address: String, reason: String },
}

impl PageError {
    /// The page address this error is about
    pub fn address(&self) -> &str {
        match self {
            PageError::InvalidAddress { address, .. }
            | PageError::Unreachable { address, .. }
            | PageError::Parse { address, .. } => address,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, PageError::Parse { .. })
    }

    pub(crate) fn unreachable(address: &str, failure: FetchFailure) -> Self {
        PageError::Unreachable {
            address: address.to_string(),
            failure,
        }
    }

    pub(crate) fn parse(address: &str, reason: impl Into<String>) -> Self {
        PageError::Parse {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}
