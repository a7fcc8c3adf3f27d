//! Plain HTML page fetching.
//!
//! Several DBLP facets (author publication lists, conference and journal
//! indices, bibtex views) exist only as HTML pages. This client issues a
//! single best-effort GET per call and hands the body to the per-facet
//! parsers; there is no retry, no caching, and no timeout beyond the
//! transport default.

use crate::error::{DblpError, Result};
use std::time::Duration;
use tracing::debug;

/// User agent string for HTML page requests
const USER_AGENT: &str = "Mozilla/5.0";

/// HTTP client for arbitrary DBLP HTML pages.
///
/// Each component instance owns its own client so tests can substitute a
/// mock server URL without touching global state.
pub struct HtmlFetcher {
    client: reqwest::Client,
}

impl HtmlFetcher {
    /// Create a fetcher with the default transport configuration.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DblpError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// GET a page and return its body text.
    ///
    /// A non-2xx status or transport failure yields a single failure signal.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "Fetching HTML page");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DblpError::Api {
                code: status.as_u16() as i32,
                message: format!("HTTP error: {}", status),
            });
        }

        let body = response.text().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let fetcher = HtmlFetcher::new().expect("fetcher");
        let body = fetcher
            .fetch(&format!("{}/page.html", server.uri()))
            .await
            .expect("fetch");
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_fails_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.html"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HtmlFetcher::new().expect("fetcher");
        let err = fetcher
            .fetch(&format!("{}/missing.html", server.uri()))
            .await
            .expect_err("expected failure");
        assert!(matches!(err, DblpError::Api { code: 404, .. }));
    }
}
