//! DBLP search API client.
//!
//! Issues parametrized queries against the three JSON facet endpoints
//! (publications, authors, venues). Each call is a single best-effort
//! attempt: a transport failure or non-2xx status yields one failure
//! signal, with no retry and no partial success.

use crate::error::{DblpError, Result};
use crate::normalize;
use crate::record::{AuthorRecord, PublicationRecord, VenueRecord};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default DBLP base URL
pub const DEFAULT_BASE_URL: &str = "https://dblp.org";

/// User agent string for requests
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// One of the three search domains exposed by the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Publication,
    Author,
    Venue,
}

impl Facet {
    /// Endpoint path segment for this facet
    fn segment(self) -> &'static str {
        match self {
            Facet::Publication => "publ",
            Facet::Author => "author",
            Facet::Venue => "venue",
        }
    }
}

/// Client for the DBLP JSON search API.
///
/// Carries its own `reqwest::Client` and base URL so tests can point it at a
/// local mock server instead of relying on hidden global configuration.
pub struct QueryClient {
    client: reqwest::Client,
    base_url: String,
}

impl QueryClient {
    /// Create a client against the public DBLP instance.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (mirrors, tests).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DblpError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Query one facet and return the raw JSON response.
    ///
    /// # Arguments
    ///
    /// * `facet` - Search domain (publication, author, venue)
    /// * `keyword` - Query string
    /// * `limit` - Result-count cap (`h` parameter)
    pub async fn query(&self, facet: Facet, keyword: &str, limit: u32) -> Result<Value> {
        let url = build_query_url(&self.base_url, facet, keyword, limit)?;

        debug!(url = %url, "Sending search request");

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DblpError::Api {
                code: status.as_u16() as i32,
                message: format!("HTTP error: {}", status),
            });
        }

        let data: Value = response.json().await?;
        Ok(data)
    }

    /// Search publications and normalize the hits.
    pub async fn search_publications(
        &self,
        keyword: &str,
        limit: u32,
    ) -> Result<Vec<PublicationRecord>> {
        let raw = self.query(Facet::Publication, keyword, limit).await?;
        let records = normalize::parse_publications(&raw);
        info!(keyword, count = records.len(), "Publication search complete");
        Ok(records)
    }

    /// Search authors and normalize the hits.
    pub async fn search_authors(&self, keyword: &str, limit: u32) -> Result<Vec<AuthorRecord>> {
        let raw = self.query(Facet::Author, keyword, limit).await?;
        let records = normalize::parse_authors(&raw);
        info!(keyword, count = records.len(), "Author search complete");
        Ok(records)
    }

    /// Search venues and normalize the hits.
    pub async fn search_venues(&self, keyword: &str, limit: u32) -> Result<Vec<VenueRecord>> {
        let raw = self.query(Facet::Venue, keyword, limit).await?;
        let records = normalize::parse_venues(&raw);
        info!(keyword, count = records.len(), "Venue search complete");
        Ok(records)
    }
}

/// Build a facet query URL with keyword and result-count cap.
fn build_query_url(base_url: &str, facet: Facet, keyword: &str, limit: u32) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/search/{}/api", base_url, facet.segment()))
        .map_err(|e| DblpError::Config(format!("Invalid base URL: {}", e)))?;

    {
        let mut params = url.query_pairs_mut();
        params.append_pair("q", keyword);
        params.append_pair("format", "json");
        params.append_pair("h", &limit.to_string());
    }

    Ok(url)
}
