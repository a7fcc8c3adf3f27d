//! Canonical record model shared by the JSON and HTML retrieval paths.
//!
//! Every scalar field of a finished record holds the [`SENTINEL`] placeholder
//! rather than being absent or null, so downstream consumers never branch on
//! missing keys. Multi-valued fields are always lists, never bare scalars.

use serde::Serialize;

/// Placeholder standing in for any unresolved field.
pub const SENTINEL: &str = "N/A";

/// One bibliographic entry, normalized from either a JSON search hit or a
/// scraped HTML publication-list item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicationRecord {
    /// Paper title
    pub title: String,
    /// Author names in document order (possibly empty, never a bare string)
    pub authors: Vec<String>,
    /// Venue label
    pub venue: String,
    /// Page range
    pub pages: String,
    /// Publication year
    pub year: String,
    /// Entry type (e.g. "article", "inproceedings")
    pub kind: String,
    /// Access flag ("open access" or sentinel)
    pub access: String,
    /// Stable DBLP key
    pub key: String,
    /// DOI with the resolver prefix stripped
    pub doi: String,
    /// Electronic edition link
    pub ee: String,
    /// Detail page URL
    pub url: String,
    /// Volume number, where the source provides one
    pub volume: String,
}

impl Default for PublicationRecord {
    fn default() -> Self {
        Self {
            title: SENTINEL.to_string(),
            authors: Vec::new(),
            venue: SENTINEL.to_string(),
            pages: SENTINEL.to_string(),
            year: SENTINEL.to_string(),
            kind: SENTINEL.to_string(),
            access: SENTINEL.to_string(),
            key: SENTINEL.to_string(),
            doi: SENTINEL.to_string(),
            ee: SENTINEL.to_string(),
            url: SENTINEL.to_string(),
            volume: SENTINEL.to_string(),
        }
    }
}

/// One author hit from the author search facet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorRecord {
    /// Primary author name
    pub name: String,
    /// Profile page URL
    pub url: String,
    /// Alternate spellings (possibly empty)
    pub aliases: Vec<String>,
    /// Disambiguation notes, e.g. affiliations (possibly empty)
    pub notes: Vec<String>,
}

impl Default for AuthorRecord {
    fn default() -> Self {
        Self {
            name: SENTINEL.to_string(),
            url: SENTINEL.to_string(),
            aliases: Vec::new(),
            notes: Vec::new(),
        }
    }
}

/// One venue hit from the venue search facet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueRecord {
    /// Full venue name
    pub name: String,
    /// Acronym (e.g. "CVPR")
    pub acronym: String,
    /// Venue type (e.g. "Conference or Workshop")
    pub kind: String,
    /// Index page URL
    pub url: String,
}

impl Default for VenueRecord {
    fn default() -> Self {
        Self {
            name: SENTINEL.to_string(),
            acronym: SENTINEL.to_string(),
            kind: SENTINEL.to_string(),
            url: SENTINEL.to_string(),
        }
    }
}

/// One ordered entry extracted from a conference or journal index page.
///
/// `sort_key` is one or more extracted integers compared lexicographically;
/// index listings are presented in descending key order, and an empty key
/// sorts after every non-empty key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexLink {
    /// Display label (e.g. "CVPR 2024" or "Volume 47: 2025")
    pub label: String,
    /// Target URL
    pub url: String,
    /// Numeric sort key extracted from the label or identifier
    pub sort_key: Vec<u32>,
}

/// Concatenate record titles into one text blob for the word-cloud collaborator.
///
/// Sentinel titles are skipped so placeholder text never skews term counts.
pub fn title_blob(records: &[PublicationRecord]) -> String {
    records
        .iter()
        .filter(|r| r.title != SENTINEL)
        .map(|r| r.title.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
