// src/wiki/http.rs
// =============================================================================
// This module fetches wiki pages over HTTP.
//
// Key functionality:
// - HEAD requests for cheap existence checks (falls back to GET when the
//   server refuses HEAD)
// - GET requests for full pages
// - Detects the various failure modes (404, timeout, SSL errors, etc.)
//   and turns them into a PageError the rest of the program understands
//
// Rust concepts:
// - async/await: For network I/O
// - Traits: WikiClient implements PageSource
// - Result<T, E> and the ? operator: For error handling
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;
use url::Url;

use super::{FetchFailure, PageError, PageSource, WikiPage};

// Settings for the HTTP client
//
// These come from the command line (see cli.rs); Default gives the values
// used when no flags are passed.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout for a single request
    pub timeout: Duration,
    /// How many redirects to follow before giving up
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_redirects: 5,
            user_agent: concat!("wiki-racer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

// Fetches pages from a live wiki
//
// Client is cheap to clone (it's just a reference counter internally) and
// pools connections, so one WikiClient serves the whole race.
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: Client,
}

impl WikiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    async fn get(&self, address: &str) -> Result<Response, PageError> {
        let url = parse_address(address)?;
        debug!(page = address, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PageError::unreachable(address, categorize_error(&e)))?;
        check_status(address, response.status())?;
        Ok(response)
    }
}

#[async_trait]
impl PageSource for WikiClient {
    async fn probe(&self, address: &str) -> Result<(), PageError> {
        let url = parse_address(address)?;
        debug!(page = address, "HEAD");
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| PageError::unreachable(address, categorize_error(&e)))?;

        // Some servers don't implement HEAD; ask again the expensive way
        if matches!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
        ) {
            return self.get(address).await.map(|_| ());
        }

        check_status(address, response.status())
    }

    async fn fetch(&self, address: &str) -> Result<WikiPage, PageError> {
        let response = self.get(address).await?;

        // A missing Content-Type is given the benefit of the doubt
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);
        if let Some(content_type) = content_type {
            if !content_type.contains("html") {
                return Err(PageError::parse(
                    address,
                    format!("expected an HTML document, got {content_type}"),
                ));
            }
        }

        let html = response.text().await.map_err(|e| {
            if e.is_decode() {
                PageError::parse(address, e.to_string())
            } else {
                PageError::unreachable(address, categorize_error(&e))
            }
        })?;

        Ok(WikiPage::new(address, html))
    }
}

// Checks that an address is an absolute http(s) URL
fn parse_address(address: &str) -> Result<Url, PageError> {
    let url = Url::parse(address).map_err(|e| PageError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PageError::InvalidAddress {
            address: address.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

// Anything outside 2xx means the page is not there for us
fn check_status(address: &str, status: StatusCode) -> Result<(), PageError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(PageError::unreachable(
            address,
            FetchFailure::Status(status.as_u16()),
        ))
    }
}

// Categorizes the different error types from reqwest
fn categorize_error(error: &reqwest::Error) -> FetchFailure {
    // Convert error to string once; reqwest hides most causes behind it
    let error_string = format!("{error:?}").to_lowercase();

    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_redirect() {
        FetchFailure::TooManyRedirects
    } else if error_string.contains("certificate")
        || error_string.contains("ssl")
        || error_string.contains("tls")
    {
        FetchFailure::Tls
    } else if error.is_connect() {
        if error_string.contains("dns") || error_string.contains("lookup") {
            FetchFailure::Dns
        } else {
            FetchFailure::Connection
        }
    } else {
        FetchFailure::Other(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> WikiClient {
        WikiClient::new(&ClientConfig {
            timeout: Duration::from_secs(2),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    fn html(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
    }

    #[tokio::test]
    async fn test_fetch_page_and_extract_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wiki/Start"))
            .respond_with(html(r#"<p><a href="/wiki/Next">next</a></p>"#))
            .mount(&server)
            .await;

        let address = format!("{}/wiki/Start", server.uri());
        let page = client().fetch(&address).await.unwrap();

        assert_eq!(page.address(), address);
        let links = page.links().unwrap();
        assert!(links.contains(&format!("{}/wiki/Next", server.uri())));
    }

    #[tokio::test]
    async fn test_missing_page_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wiki/Gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let address = format!("{}/wiki/Gone", server.uri());
        let err = client().fetch(&address).await.unwrap_err();
        assert_eq!(err, PageError::unreachable(&address, FetchFailure::Status(404)));
    }

    #[tokio::test]
    async fn test_non_html_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wiki/Data"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"not":"html"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let address = format!("{}/wiki/Data", server.uri());
        let err = client().fetch(&address).await.unwrap_err();
        assert!(err.is_parse());
    }

    #[tokio::test]
    async fn test_probe_uses_head() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/wiki/Start"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let address = format!("{}/wiki/Start", server.uri());
        client().probe(&address).await.unwrap();
    }

    #[tokio::test]
    async fn test_probe_falls_back_to_get() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/wiki/Start"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wiki/Start"))
            .respond_with(html("<p>hello</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let address = format!("{}/wiki/Start", server.uri());
        client().probe(&address).await.unwrap();
    }

    #[tokio::test]
    async fn test_probe_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let address = format!("{}/wiki/Broken", server.uri());
        let err = client().probe(&address).await.unwrap_err();
        assert!(matches!(
            err,
            PageError::Unreachable { failure: FetchFailure::Status(500), .. }
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        // Port 1 is reserved and nothing listens there
        let err = client().fetch("http://127.0.0.1:1/wiki/A").await.unwrap_err();
        assert!(matches!(err, PageError::Unreachable { .. }));
    }

    #[test]
    fn test_parse_address() {
        assert!(parse_address("https://wiki.test/wiki/A").is_ok());
        assert!(matches!(
            parse_address("not a url"),
            Err(PageError::InvalidAddress { .. })
        ));
        assert!(matches!(
            parse_address("ftp://wiki.test/wiki/A"),
            Err(PageError::InvalidAddress { .. })
        ));
    }
}
