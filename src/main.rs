//! rustdblp - DBLP metadata retrieval and normalization engine
//!
//! Command-line surface over the retrieval pipeline: facet search, author
//! profile scraping, venue index extraction, and per-record enrichment.
//!
//! ## Usage
//!
//! ```bash
//! rustdblp search "transformer vision" --facet publ --limit 20
//! rustdblp profile https://dblp.org/pid/202/1700.html
//! rustdblp conf-years https://dblp.org/db/conf/cvpr/index.html
//! rustdblp journal-volumes https://dblp.org/db/journals/pami/index.html
//! rustdblp bibtex https://dblp.org/rec/conf/ciarp/RozendoRNNL23
//! rustdblp abstract 10.1109/CVPR52688.2022.01846
//! ```

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use rustdblp::enrich::EnrichmentClient;
use rustdblp::profile::ProfileScraper;
use rustdblp::record::{title_blob, IndexLink, PublicationRecord};
use rustdblp::search::{Facet, QueryClient};
use rustdblp::venues::VenueIndexExtractor;
use rustdblp::worker::ActionSlot;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// DBLP metadata retrieval and normalization engine
#[derive(Parser)]
#[command(name = "rustdblp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search one facet of the DBLP JSON API
    Search {
        /// Search keyword
        keyword: String,

        /// Facet: publ, author or venue
        #[arg(long, default_value = "publ", value_parser = ["publ", "author", "venue"])]
        facet: String,

        /// Result-count cap
        #[arg(long, default_value_t = 20)]
        limit: u32,

        /// Directory for a CSV export of publication results
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print the concatenated title blob (word-cloud input)
        #[arg(long)]
        titles_blob: bool,
    },

    /// Scrape every publication from a profile or volume TOC page
    Profile {
        /// Page URL, e.g. https://dblp.org/pid/202/1700.html
        url: String,

        /// Directory for a CSV export
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print the concatenated title blob (word-cloud input)
        #[arg(long)]
        titles_blob: bool,
    },

    /// List the yearly TOC links of a conference index page
    ConfYears {
        /// Index URL, e.g. https://dblp.org/db/conf/cvpr/index.html
        url: String,

        /// Keep only the most recent N entries
        #[arg(long)]
        recent: Option<usize>,
    },

    /// List the volume links of a journal index page
    JournalVolumes {
        /// Index URL, e.g. https://dblp.org/db/journals/pami/index.html
        url: String,

        /// Keep only the most recent N entries
        #[arg(long)]
        recent: Option<usize>,
    },

    /// Fetch the BibTeX text for a record detail URL
    Bibtex {
        /// Detail URL, e.g. https://dblp.org/rec/conf/ciarp/RozendoRNNL23
        url: String,
    },

    /// Fetch a record's abstract by DOI
    Abstract {
        /// DOI, e.g. 10.1109/CVPR52688.2022.01846
        doi: String,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Search {
            keyword,
            facet,
            limit,
            output,
            titles_blob,
        } => run_search(keyword, facet, limit, output, titles_blob).await,
        Commands::Profile {
            url,
            output,
            titles_blob,
        } => run_profile(url, output, titles_blob).await,
        Commands::ConfYears { url, recent } => {
            let extractor = VenueIndexExtractor::new()?;
            let mut slot: ActionSlot<Vec<IndexLink>> = ActionSlot::new();
            slot.start(async move { extractor.conference_years(&url).await });
            let links = unwrap_event(slot.recv().await.outcome)?;
            print_index_links(&links, recent)
        }
        Commands::JournalVolumes { url, recent } => {
            let extractor = VenueIndexExtractor::new()?;
            let mut slot: ActionSlot<Vec<IndexLink>> = ActionSlot::new();
            slot.start(async move { extractor.journal_volumes(&url).await });
            let links = unwrap_event(slot.recv().await.outcome)?;
            print_index_links(&links, recent)
        }
        Commands::Bibtex { url } => {
            let client = EnrichmentClient::new()?;
            let mut slot: ActionSlot<String> = ActionSlot::new();
            slot.start(async move { client.bibtex(&url).await });
            let text = unwrap_event(slot.recv().await.outcome)?;
            println!("{}", text);
            Ok(())
        }
        Commands::Abstract { doi } => {
            let client = EnrichmentClient::new()?;
            let mut slot: ActionSlot<String> = ActionSlot::new();
            slot.start(async move { client.abstract_by_doi(&doi).await });
            let text = unwrap_event(slot.recv().await.outcome)?;
            println!("{}", text);
            Ok(())
        }
    }
}

/// Turn a task's terminal outcome into the command result.
fn unwrap_event<T>(outcome: std::result::Result<T, String>) -> Result<T> {
    outcome.map_err(|message| anyhow!(message))
}

// ============================================================================
// Commands
// ============================================================================

async fn run_search(
    keyword: String,
    facet: String,
    limit: u32,
    output: Option<PathBuf>,
    titles_blob: bool,
) -> Result<()> {
    let client = QueryClient::new()?;

    match facet.as_str() {
        "publ" => {
            let mut slot: ActionSlot<Vec<PublicationRecord>> = ActionSlot::new();
            let kw = keyword.clone();
            slot.start(async move { client.search_publications(&kw, limit).await });
            let records = unwrap_event(slot.recv().await.outcome)?;
            emit_publications(&records, &keyword, output, titles_blob)
        }
        "author" => {
            let mut slot = ActionSlot::new();
            let kw = keyword.clone();
            slot.start(async move { client.search_authors(&kw, limit).await });
            let records = unwrap_event(slot.recv().await.outcome)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        "venue" => {
            let mut slot = ActionSlot::new();
            let kw = keyword.clone();
            slot.start(async move { client.search_venues(&kw, limit).await });
            let records = unwrap_event(slot.recv().await.outcome)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        other => Err(anyhow!("Unknown facet: {}", other)),
    }
}

async fn run_profile(url: String, output: Option<PathBuf>, titles_blob: bool) -> Result<()> {
    let scraper = ProfileScraper::new()?;
    let mut slot: ActionSlot<Vec<PublicationRecord>> = ActionSlot::new();
    let page_url = url.clone();
    slot.start(async move { scraper.fetch(&page_url).await });
    let records = unwrap_event(slot.recv().await.outcome)?;
    emit_publications(&records, &url, output, titles_blob)
}

// ============================================================================
// Output
// ============================================================================

/// Flat CSV row shape; list fields joined for tabular output.
#[derive(Serialize)]
struct PublicationRow {
    title: String,
    authors: String,
    venue: String,
    pages: String,
    year: String,
    kind: String,
    access: String,
    key: String,
    doi: String,
    ee: String,
    url: String,
    volume: String,
}

impl From<&PublicationRecord> for PublicationRow {
    fn from(record: &PublicationRecord) -> Self {
        Self {
            title: record.title.clone(),
            authors: record.authors.join(", "),
            venue: record.venue.clone(),
            pages: record.pages.clone(),
            year: record.year.clone(),
            kind: record.kind.clone(),
            access: record.access.clone(),
            key: record.key.clone(),
            doi: record.doi.clone(),
            ee: record.ee.clone(),
            url: record.url.clone(),
            volume: record.volume.clone(),
        }
    }
}

fn emit_publications(
    records: &[PublicationRecord],
    source: &str,
    output: Option<PathBuf>,
    titles_blob: bool,
) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);

    if titles_blob {
        println!("\n--- title blob ---\n{}", title_blob(records));
    }

    if let Some(dir) = output {
        std::fs::create_dir_all(&dir).context("Failed to create output directory")?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let safe_source: String = source
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
            .collect::<String>()
            .trim()
            .replace(' ', "_");
        let path = dir.join(format!("{}_{}.csv", timestamp, safe_source));
        let rows: Vec<PublicationRow> = records.iter().map(PublicationRow::from).collect();
        save_csv(&path, &rows)?;
    }

    Ok(())
}

fn print_index_links(links: &[IndexLink], recent: Option<usize>) -> Result<()> {
    let shown = match recent {
        Some(n) => &links[..links.len().min(n)],
        None => links,
    };
    for link in shown {
        println!("{}: {}", link.label, link.url);
    }
    Ok(())
}

/// Save rows to a CSV file
fn save_csv<T: Serialize>(path: &Path, data: &[T]) -> Result<()> {
    if data.is_empty() {
        println!("No data to save to {:?}", path);
        return Ok(());
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context("Failed to create CSV writer")?;

    for item in data {
        wtr.serialize(item).context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV")?;
    println!("Saved: {:?}", path);
    Ok(())
}
