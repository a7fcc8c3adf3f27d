//! Normalization of raw DBLP search API responses.
//!
//! The JSON API nests hits at `result.hits.hit[].info`, and every
//! multi-valued field (authors, aliases, notes) may appear as an absent key,
//! a single object, or an array of objects depending on the entry. The shape
//! is resolved exactly once here, at the parse boundary, into a flat ordered
//! list of strings; the rest of the crate only ever sees canonical records.
//!
//! Defensive-parsing rules:
//! - a field-level failure degrades to the sentinel for that field only;
//! - an unrecognized nested shape degrades to an empty list for that subfield;
//! - one malformed hit never aborts the rest of the batch;
//! - a response with no hits at all yields an empty list, not an error.

use crate::record::{AuthorRecord, PublicationRecord, VenueRecord, SENTINEL};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// A multi-valued field as the API actually ships it: absent keys never reach
/// this type (the caller maps them to `Vec::new()`), the remaining shapes are
/// one object, an array, or something unrecognized.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Multi {
    Many(Vec<NameValue>),
    Single(NameValue),
}

/// One element of a multi-valued field: a `{"text": ...}` object (extra keys
/// such as `@pid` are ignored), a bare string, or an unrecognized value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NameValue {
    Text { text: String },
    Bare(String),
    Other(Value),
}

impl Multi {
    /// Resolve to a flat ordered list of strings.
    fn resolve(self) -> Vec<String> {
        match self {
            Multi::Many(items) => items.into_iter().filter_map(NameValue::into_name).collect(),
            Multi::Single(item) => item.into_name().into_iter().collect(),
        }
    }
}

impl NameValue {
    /// Extract the display text. Objects without a usable `text` key keep
    /// their slot as a sentinel; scalar junk is dropped.
    fn into_name(self) -> Option<String> {
        match self {
            NameValue::Text { text } => Some(text),
            NameValue::Bare(text) => Some(text),
            NameValue::Other(Value::Object(_)) => Some(SENTINEL.to_string()),
            NameValue::Other(_) => None,
        }
    }
}

/// Parse publication search hits into canonical records.
pub fn parse_publications(data: &Value) -> Vec<PublicationRecord> {
    hits(data)
        .iter()
        .map(|hit| {
            let info = hit.get("info").unwrap_or(&Value::Null);
            PublicationRecord {
                title: scalar(info, "title"),
                authors: multi(info, "authors", "author"),
                venue: scalar(info, "venue"),
                pages: scalar(info, "pages"),
                year: scalar(info, "year"),
                kind: scalar(info, "type"),
                access: scalar(info, "access"),
                key: scalar(info, "key"),
                doi: scalar(info, "doi"),
                ee: scalar(info, "ee"),
                url: scalar(info, "url"),
                volume: scalar(info, "volume"),
            }
        })
        .collect()
}

/// Parse author search hits into canonical records.
pub fn parse_authors(data: &Value) -> Vec<AuthorRecord> {
    hits(data)
        .iter()
        .map(|hit| {
            let info = hit.get("info").unwrap_or(&Value::Null);
            AuthorRecord {
                name: scalar(info, "author"),
                url: scalar(info, "url"),
                aliases: multi(info, "aliases", "alias"),
                notes: multi(info, "notes", "note"),
            }
        })
        .collect()
}

/// Parse venue search hits into canonical records.
pub fn parse_venues(data: &Value) -> Vec<VenueRecord> {
    hits(data)
        .iter()
        .map(|hit| {
            let info = hit.get("info").unwrap_or(&Value::Null);
            VenueRecord {
                name: scalar(info, "venue"),
                acronym: scalar(info, "acronym"),
                kind: scalar(info, "type"),
                url: scalar(info, "url"),
            }
        })
        .collect()
}

/// Locate `result.hits.hit` in a search response.
fn hits(data: &Value) -> Vec<&Value> {
    match data
        .get("result")
        .and_then(|r| r.get("hits"))
        .and_then(|h| h.get("hit"))
    {
        Some(Value::Array(items)) => items.iter().collect(),
        // An empty result set omits the hit array entirely
        Some(other) => {
            warn!(shape = ?other, "Unexpected hit container shape");
            Vec::new()
        }
        None => {
            warn!("Response carries no result.hits.hit");
            Vec::new()
        }
    }
}

/// Read a scalar field, coercing numbers to text and substituting the
/// sentinel for anything else.
fn scalar(info: &Value, key: &str) -> String {
    match info.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => SENTINEL.to_string(),
    }
}

/// Read a multi-valued field nested as `info.<group>.<item>` and resolve its
/// shape into a flat list.
fn multi(info: &Value, group: &str, item: &str) -> Vec<String> {
    let Some(raw) = info.get(group).and_then(|g| g.get(item)) else {
        return Vec::new();
    };
    match serde_json::from_value::<Multi>(raw.clone()) {
        Ok(multi) => multi.resolve(),
        Err(e) => {
            warn!(group, item, error = %e, "Unrecognized multi-valued shape");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(hits: Value) -> Value {
        json!({ "result": { "hits": { "hit": hits } } })
    }

    #[test]
    fn test_authors_single_and_array_shapes_agree() {
        let single = response(json!([
            { "info": { "title": "T", "authors": { "author": { "text": "Jane Roe" } } } }
        ]));
        let array = response(json!([
            { "info": { "title": "T", "authors": { "author": [ { "text": "Jane Roe" } ] } } }
        ]));
        let missing = response(json!([{ "info": { "title": "T" } }]));

        let from_single = parse_publications(&single);
        let from_array = parse_publications(&array);
        let from_missing = parse_publications(&missing);

        assert_eq!(from_single[0].authors, vec!["Jane Roe"]);
        assert_eq!(from_single[0].authors, from_array[0].authors);
        assert!(from_missing[0].authors.is_empty());
    }

    #[test]
    fn test_author_order_preserved() {
        let data = response(json!([
            { "info": { "authors": { "author": [
                { "@pid": "1", "text": "First Author" },
                { "@pid": "2", "text": "Second Author" },
                { "@pid": "3", "text": "Third Author" }
            ] } } }
        ]));
        let records = parse_publications(&data);
        assert_eq!(
            records[0].authors,
            vec!["First Author", "Second Author", "Third Author"]
        );
    }

    #[test]
    fn test_malformed_hit_degrades_without_aborting_batch() {
        let data = response(json!([
            { "info": { "title": "Good Paper", "year": "2024" } },
            { "info": 42 },
            { "info": { "title": { "nested": true }, "year": "2023" } }
        ]));
        let records = parse_publications(&data);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title, "Good Paper");
        assert_eq!(records[1].title, SENTINEL);
        // Field-level degradation only: the year next to the bad title survives
        assert_eq!(records[2].title, SENTINEL);
        assert_eq!(records[2].year, "2023");
    }

    #[test]
    fn test_unrecognized_author_shape_degrades_to_empty_list() {
        let data = response(json!([
            { "info": { "title": "T", "authors": { "author": 7 } } }
        ]));
        let records = parse_publications(&data);
        assert!(records[0].authors.is_empty());
    }

    #[test]
    fn test_numeric_year_coerced_to_text() {
        let data = response(json!([{ "info": { "title": "T", "year": 2021 } }]));
        assert_eq!(parse_publications(&data)[0].year, "2021");
    }

    #[test]
    fn test_missing_hits_container_yields_empty() {
        assert!(parse_publications(&json!({})).is_empty());
        assert!(parse_publications(&json!({ "result": { "hits": { "@total": "0" } } })).is_empty());
    }

    #[test]
    fn test_parse_authors_aliases_and_notes() {
        let data = response(json!([
            { "info": {
                "author": "Geoffrey E. Hinton",
                "url": "https://dblp.org/pid/10/3248",
                "aliases": { "alias": [ "G. Hinton", { "text": "G. E. Hinton" } ] },
                "notes": { "note": { "@type": "affiliation", "text": "University of Toronto" } }
            } }
        ]));
        let records = parse_authors(&data);
        assert_eq!(records[0].name, "Geoffrey E. Hinton");
        assert_eq!(records[0].aliases, vec!["G. Hinton", "G. E. Hinton"]);
        assert_eq!(records[0].notes, vec!["University of Toronto"]);
    }

    #[test]
    fn test_parse_venues() {
        let data = response(json!([
            { "info": {
                "venue": "IEEE Conference on Computer Vision and Pattern Recognition",
                "acronym": "CVPR",
                "type": "Conference or Workshop",
                "url": "https://dblp.org/db/conf/cvpr/"
            } },
            { "info": { "venue": "Nameless Workshop" } }
        ]));
        let records = parse_venues(&data);
        assert_eq!(records[0].acronym, "CVPR");
        assert_eq!(records[1].acronym, SENTINEL);
        assert_eq!(records[1].kind, SENTINEL);
    }

    #[test]
    fn test_object_without_text_keeps_slot_as_sentinel() {
        let data = response(json!([
            { "info": { "authors": { "author": [ { "text": "Known" }, { "@pid": "9" } ] } } }
        ]));
        let records = parse_publications(&data);
        assert_eq!(records[0].authors, vec!["Known", SENTINEL]);
    }
}
