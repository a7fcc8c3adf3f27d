//! On-demand enrichment of single records.
//!
//! Two independent lookups, each a single best-effort attempt:
//! - the BibTeX text of a record, scraped from the detail page's
//!   `?view=bibtex` rendering;
//! - the abstract of a record, via the Semantic Scholar Graph API keyed
//!   by DOI.
//!
//! Missing-content cases stay distinguishable from transport failures:
//! a fetched page without the bibtex container fails differently from a
//! page whose container lacks the pre-formatted block, and an abstract
//! lookup that succeeds at the HTTP level but carries no abstract is still
//! a visible failure, never a silent empty string.

use crate::error::{DblpError, Result};
use crate::fetch::HtmlFetcher;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Semantic Scholar Graph API base URL
pub const DEFAULT_ABSTRACT_API_BASE: &str = "https://api.semanticscholar.org/graph/v1";

/// Client for per-record secondary lookups.
pub struct EnrichmentClient {
    fetcher: HtmlFetcher,
    client: reqwest::Client,
    abstract_api_base: String,
}

/// Abstract lookup response; only the fields we read.
#[derive(Debug, Deserialize)]
struct AbstractResponse {
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
}

impl EnrichmentClient {
    /// Create a client against the public Semantic Scholar instance.
    pub fn new() -> Result<Self> {
        Self::with_abstract_api_base(DEFAULT_ABSTRACT_API_BASE)
    }

    /// Create a client with a custom abstract-service base URL (tests).
    pub fn with_abstract_api_base(base: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DblpError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            fetcher: HtmlFetcher::new()?,
            client,
            abstract_api_base: base.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the BibTeX text for a record's detail page URL.
    ///
    /// Appends `?view=bibtex` and extracts the pre-formatted block inside
    /// the `bibtex-section` container.
    pub async fn bibtex(&self, detail_url: &str) -> Result<String> {
        let url = format!("{}?view=bibtex", detail_url);
        let html = self.fetcher.fetch(&url).await?;
        let text = extract_bibtex(&html)?;
        info!(url = detail_url, bytes = text.len(), "BibTeX fetched");
        Ok(text)
    }

    /// Fetch a record's abstract by DOI via Semantic Scholar.
    pub async fn abstract_by_doi(&self, doi: &str) -> Result<String> {
        let url = format!(
            "{}/paper/DOI:{}?fields=title,abstract,authors,year",
            self.abstract_api_base, doi
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DblpError::AbstractService(format!(
                "lookup for DOI {} returned {}",
                doi, status
            )));
        }

        let data: AbstractResponse = response
            .json()
            .await
            .map_err(|e| DblpError::AbstractService(format!("unexpected response: {}", e)))?;

        match data.abstract_text {
            Some(text) if !text.is_empty() => {
                info!(doi, bytes = text.len(), "Abstract fetched");
                Ok(text)
            }
            _ => Err(DblpError::AbstractService(format!(
                "no abstract available for DOI {}",
                doi
            ))),
        }
    }
}

/// Extract the pre-formatted BibTeX block from a `?view=bibtex` page.
fn extract_bibtex(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let section_selector = Selector::parse("div#bibtex-section")
        .map_err(|e| DblpError::Parse(e.to_string()))?;
    let pre_selector = Selector::parse("pre").map_err(|e| DblpError::Parse(e.to_string()))?;

    let section = document
        .select(&section_selector)
        .next()
        .ok_or(DblpError::BibtexSectionMissing)?;

    let block = section
        .select(&pre_selector)
        .next()
        .ok_or(DblpError::BibtexBlockMissing)?;

    Ok(block.text().collect::<String>().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BIBTEX_PAGE: &str = concat!(
        "<html><body><div id=\"bibtex-section\" class=\"section\">",
        "<pre>@inproceedings{DBLP:conf/ciarp/RozendoRNNL23,\n  title = {...}\n}</pre>",
        "</div></body></html>",
    );

    #[test]
    fn test_extract_bibtex() {
        let text = extract_bibtex(BIBTEX_PAGE).expect("extract");
        assert!(text.starts_with("@inproceedings{DBLP:conf/ciarp/RozendoRNNL23"));
    }

    #[test]
    fn test_missing_section_vs_missing_block() {
        let no_section = extract_bibtex("<html><body></body></html>").expect_err("expected error");
        let no_block =
            extract_bibtex("<html><body><div id=\"bibtex-section\"></div></body></html>")
                .expect_err("expected error");
        assert!(matches!(no_section, DblpError::BibtexSectionMissing));
        assert!(matches!(no_block, DblpError::BibtexBlockMissing));
        assert_ne!(no_section.to_string(), no_block.to_string());
    }

    #[tokio::test]
    async fn test_bibtex_fetch_appends_view_suffix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rec/conf/ciarp/RozendoRNNL23"))
            .and(query_param("view", "bibtex"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BIBTEX_PAGE))
            .mount(&server)
            .await;

        let client = EnrichmentClient::new().expect("client");
        let text = client
            .bibtex(&format!("{}/rec/conf/ciarp/RozendoRNNL23", server.uri()))
            .await
            .expect("bibtex");
        assert!(text.contains("RozendoRNNL23"));
    }

    #[tokio::test]
    async fn test_bibtex_transport_failure_distinct_from_missing_section() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rec/conf/x/Down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rec/conf/x/Empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = EnrichmentClient::new().expect("client");
        let transport = client
            .bibtex(&format!("{}/rec/conf/x/Down", server.uri()))
            .await
            .expect_err("expected error");
        let missing = client
            .bibtex(&format!("{}/rec/conf/x/Empty", server.uri()))
            .await
            .expect_err("expected error");

        assert!(matches!(transport, DblpError::Api { code: 503, .. }));
        assert!(matches!(missing, DblpError::BibtexSectionMissing));
        assert_ne!(transport.to_string(), missing.to_string());
    }

    #[tokio::test]
    async fn test_abstract_by_doi() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paper/DOI:10.1109/CVPR52688.2022.01846"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "Some Paper",
                "abstract": "We study things.",
            })))
            .mount(&server)
            .await;

        let client = EnrichmentClient::with_abstract_api_base(&server.uri()).expect("client");
        let text = client
            .abstract_by_doi("10.1109/CVPR52688.2022.01846")
            .await
            .expect("abstract");
        assert_eq!(text, "We study things.");
    }

    #[tokio::test]
    async fn test_absent_abstract_is_visible_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paper/DOI:10.1000/none"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "Some Paper",
                "abstract": null,
            })))
            .mount(&server)
            .await;

        let client = EnrichmentClient::with_abstract_api_base(&server.uri()).expect("client");
        let err = client.abstract_by_doi("10.1000/none").await.expect_err("expected error");
        assert!(matches!(err, DblpError::AbstractService(_)));
    }

    #[tokio::test]
    async fn test_abstract_non_2xx_is_service_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paper/DOI:10.1000/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = EnrichmentClient::with_abstract_api_base(&server.uri()).expect("client");
        let err = client.abstract_by_doi("10.1000/gone").await.expect_err("expected error");
        assert!(matches!(err, DblpError::AbstractService(_)));
    }
}
