//! Conference and journal index page extraction.
//!
//! Both operations reduce an index page to an ordered list of
//! [`IndexLink`]s. Conferences list yearly table-of-contents entries;
//! journals list volume links. Sort keys are parsed by explicit helper
//! functions returning numeric tuples, keeping the ordering independent of
//! incidental label formatting: descending lexicographic comparison, with
//! the empty key (no digits at all) after every non-empty key.

use crate::error::{DblpError, Result};
use crate::fetch::HtmlFetcher;
use crate::record::IndexLink;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::info;

/// Extractor for venue index pages.
pub struct VenueIndexExtractor {
    fetcher: HtmlFetcher,
}

impl VenueIndexExtractor {
    /// Create an extractor with a fresh transport client.
    pub fn new() -> Result<Self> {
        Ok(Self {
            fetcher: HtmlFetcher::new()?,
        })
    }

    /// Fetch a conference index page and extract its yearly TOC links,
    /// newest year first.
    pub async fn conference_years(&self, index_url: &str) -> Result<Vec<IndexLink>> {
        let html = self.fetcher.fetch(index_url).await?;
        let links = parse_conference_index(index_url, &html)?;
        info!(url = index_url, count = links.len(), "Conference index parsed");
        Ok(links)
    }

    /// Fetch a journal index page and extract its volume links, highest
    /// volume first.
    pub async fn journal_volumes(&self, index_url: &str) -> Result<Vec<IndexLink>> {
        let html = self.fetcher.fetch(index_url).await?;
        let links = parse_journal_index(&html)?;
        info!(url = index_url, count = links.len(), "Journal index parsed");
        Ok(links)
    }
}

/// Parse a conference index page into `"<ABBR> <year>"` links, sorted by
/// year descending. Entries with no parsable 4-digit year are dropped,
/// never defaulted.
pub fn parse_conference_index(index_url: &str, html: &str) -> Result<Vec<IndexLink>> {
    let abbr = conference_abbreviation(index_url)?;

    let document = Html::parse_document(html);
    let item_selector = Selector::parse("li.entry.editor.toc")
        .map_err(|e| DblpError::Parse(e.to_string()))?;
    let link_selector =
        Selector::parse("a[href]").map_err(|e| DblpError::Parse(e.to_string()))?;

    let mut links = Vec::new();

    for item in document.select(&item_selector) {
        let Some(anchor) = item.select(&link_selector).next() else {
            continue;
        };
        let href = anchor.value().attr("href").unwrap_or("");

        // Year lives in the item id, with the link target as fallback
        let id = item.value().attr("id").unwrap_or("");
        let source = if id.is_empty() { href } else { id };
        let Some(year) = first_year(source) else {
            continue;
        };

        links.push(IndexLink {
            label: format!("{} {}", abbr, year),
            url: href.to_string(),
            sort_key: vec![year],
        });
    }

    sort_descending(&mut links);
    Ok(links)
}

/// Parse a journal index page into volume links, sorted by the integers
/// embedded in each label, descending; digitless labels sort last.
///
/// The link filter is a substring match on the target (`db/journals` +
/// `html`), faithful to the upstream page structure where volume anchors
/// sit inside plain list items.
pub fn parse_journal_index(html: &str) -> Result<Vec<IndexLink>> {
    let document = Html::parse_document(html);
    let link_selector =
        Selector::parse("li a[href]").map_err(|e| DblpError::Parse(e.to_string()))?;

    let mut links = Vec::new();

    for anchor in document.select(&link_selector) {
        let href = anchor.value().attr("href").unwrap_or("");
        if !(href.contains("db/journals") && href.contains("html")) {
            continue;
        }
        let label = anchor.text().collect::<String>().trim().to_string();
        let sort_key = digit_runs(&label);
        links.push(IndexLink {
            label,
            url: href.to_string(),
            sort_key,
        });
    }

    sort_descending(&mut links);
    Ok(links)
}

/// Derive the venue abbreviation from a conference index URL path.
fn conference_abbreviation(index_url: &str) -> Result<String> {
    let re = Regex::new(r"/conf/([^/]+)/").map_err(|e| DblpError::Parse(e.to_string()))?;
    re.captures(index_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_uppercase())
        .ok_or_else(|| {
            DblpError::Parse(format!(
                "Cannot derive conference abbreviation from URL: {}",
                index_url
            ))
        })
}

/// First 4-digit number in the text, if any.
fn first_year(text: &str) -> Option<u32> {
    let re = Regex::new(r"\d{4}").ok()?;
    re.find(text)?.as_str().parse().ok()
}

/// Every run of digits in the text, in order, as a numeric tuple.
fn digit_runs(text: &str) -> Vec<u32> {
    match Regex::new(r"\d+") {
        Ok(re) => re
            .find_iter(text)
            .filter_map(|m| m.as_str().parse().ok())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Descending lexicographic order on the numeric keys. The empty key
/// compares below every non-empty key, so digitless entries land last.
fn sort_descending(links: &mut [IndexLink]) {
    links.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
}
