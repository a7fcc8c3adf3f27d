//! Author profile page scraping.
//!
//! A DBLP profile page carries one flat `ul.publ-list` alternating year
//! markers (`li.year`) and paper entries (`li.entry`). Parsing maintains a
//! year cursor: every entry is stamped with the most recently seen marker
//! value, and entries before any marker carry the sentinel. Volume TOC pages
//! (conference proceedings, journal volumes) use the same list markup, so
//! this scraper serves those too.
//!
//! Extraction is defensive: every field resolves to its sentinel when the
//! expected element is absent, and one odd entry never aborts the rest of
//! the page.

use crate::error::{DblpError, Result};
use crate::fetch::HtmlFetcher;
use crate::record::{PublicationRecord, SENTINEL};
use scraper::{ElementRef, Html, Selector};
use tracing::info;

/// DOI resolver prefixes stripped from electronic links.
const DOI_PREFIXES: [&str; 2] = ["https://doi.org/", "http://doi.org/"];

/// Scraper for publication-list pages.
pub struct ProfileScraper {
    fetcher: HtmlFetcher,
}

impl ProfileScraper {
    /// Create a scraper with a fresh transport client.
    pub fn new() -> Result<Self> {
        Ok(Self {
            fetcher: HtmlFetcher::new()?,
        })
    }

    /// Fetch a publication-list page and parse every entry on it.
    pub async fn fetch(&self, url: &str) -> Result<Vec<PublicationRecord>> {
        let html = self.fetcher.fetch(url).await?;
        let records = parse_profile(&html)?;
        info!(url, count = records.len(), "Profile page parsed");
        Ok(records)
    }
}

/// Parse the publication list out of profile page HTML.
pub fn parse_profile(html: &str) -> Result<Vec<PublicationRecord>> {
    let document = Html::parse_document(html);

    let item_selector = Selector::parse("ul.publ-list > li")
        .map_err(|e| DblpError::Parse(e.to_string()))?;
    let selectors = EntrySelectors::new()?;

    let mut records = Vec::new();
    let mut current_year: Option<String> = None;

    for item in document.select(&item_selector) {
        let classes: Vec<&str> = item.value().classes().collect();

        if classes.contains(&"year") {
            current_year = Some(text_of(item));
            continue;
        }

        if classes.contains(&"entry") {
            records.push(parse_entry(item, &classes, current_year.as_deref(), &selectors));
        }
    }

    Ok(records)
}

/// Pre-parsed selectors shared across entries.
struct EntrySelectors {
    title: Selector,
    author: Selector,
    venue: Selector,
    pages: Selector,
    access_icon: Selector,
    link: Selector,
    volume: Selector,
}

impl EntrySelectors {
    fn new() -> Result<Self> {
        let parse = |s: &str| Selector::parse(s).map_err(|e| DblpError::Parse(e.to_string()));
        Ok(Self {
            title: parse("span.title")?,
            author: parse("span[itemprop=\"author\"]")?,
            venue: parse("span.venue")?,
            pages: parse("span[itemprop=\"pagination\"]")?,
            access_icon: parse("img[alt=\"open access\"]")?,
            link: parse("a[href]")?,
            volume: parse("span[itemprop=\"volumeNumber\"]")?,
        })
    }
}

/// Parse one `li.entry` into a record, stamping the year cursor.
fn parse_entry(
    item: ElementRef,
    classes: &[&str],
    current_year: Option<&str>,
    selectors: &EntrySelectors,
) -> PublicationRecord {
    let mut record = PublicationRecord {
        year: current_year.unwrap_or(SENTINEL).to_string(),
        ..Default::default()
    };

    if let Some(title) = item.select(&selectors.title).next() {
        record.title = text_of(title);
    }

    record.authors = item.select(&selectors.author).map(text_of).collect();

    if let Some(venue) = item.select(&selectors.venue).next() {
        record.venue = text_of(venue);
    }

    if let Some(pages) = item.select(&selectors.pages).next() {
        record.pages = text_of(pages);
    }

    // Entry type is the classification token next to the generic marker
    if let Some(kind) = classes.iter().find(|c| **c != "entry") {
        record.kind = (*kind).to_string();
    }

    if item.select(&selectors.access_icon).next().is_some() {
        record.access = "open access".to_string();
    }

    if let Some(id) = item.value().attr("id") {
        record.key = id.to_string();
    }

    for link in item.select(&selectors.link) {
        let href = link.value().attr("href").unwrap_or("");
        if record.doi == SENTINEL {
            if let Some(doi) = strip_doi_prefix(href) {
                record.doi = doi.to_string();
            }
        }
        if record.ee == SENTINEL && link_text_is_ee(link) {
            record.ee = href.to_string();
        }
        if record.url == SENTINEL && href.contains("/rec/") {
            record.url = href.to_string();
        }
    }

    if let Some(volume) = item.select(&selectors.volume).next() {
        record.volume = text_of(volume);
    }

    record
}

/// Strip exactly the DOI resolver prefix, leaving the raw DOI unchanged.
fn strip_doi_prefix(href: &str) -> Option<&str> {
    DOI_PREFIXES
        .iter()
        .find_map(|prefix| href.strip_prefix(prefix))
}

/// Does this link's visible text call it an electronic edition?
fn link_text_is_ee(link: ElementRef) -> bool {
    text_of(link).to_lowercase().contains("electronic edition")
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
