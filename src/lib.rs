//! # rustdblp
//!
//! DBLP metadata retrieval and normalization engine
//!
//! Aggregates bibliographic metadata from DBLP into one canonical record
//! model, reconciling the JSON search API with HTML scraping for the facets
//! the service only exposes as pages (author publication lists, venue
//! indices).
//!
//! ## Modules
//!
//! - [`search`] - JSON search API client (publications, authors, venues)
//! - [`normalize`] - Raw JSON hits to canonical records
//! - [`fetch`] - Plain HTML page fetching
//! - [`profile`] - Author profile / volume TOC page scraping
//! - [`venues`] - Conference year and journal volume index extraction
//! - [`enrich`] - Per-record BibTeX and abstract lookup
//! - [`worker`] - Off-thread task dispatch with superseding action slots
//! - [`record`] - Canonical record model
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustdblp::search::QueryClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = QueryClient::new()?;
//!     let records = client.search_publications("transformer vision", 3).await?;
//!     println!("Found {} records", records.len());
//!     Ok(())
//! }
//! ```

pub mod enrich;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod profile;
pub mod record;
pub mod search;
pub mod venues;
pub mod worker;

pub use error::{DblpError, Result};
pub use record::{AuthorRecord, IndexLink, PublicationRecord, VenueRecord, SENTINEL};
