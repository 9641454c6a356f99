//! Raw dataset preprocessing.
//!
//! [`run`] is the I/O shell around the pure [`clean::clean`] step: it loads
//! the raw source, cleans it, and atomically replaces the canonical store.
//! Ingest failures abort the run before anything is written; row-level
//! problems only show up in the returned [`CleaningReport`].

pub mod clean;
pub mod types;

use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{IngestError, PreprocessError};
use crate::fetch::{BasicClient, fetch_bytes, is_remote};
use crate::output::write_canonical;
use crate::parser::parse_raw;
use crate::preprocess::types::RawRecord;
use crate::stats::CleaningReport;

pub use clean::clean;

/// Loads raw bytes from a local path or an `http(s)://` URL.
pub async fn load_source(source: &str) -> Result<Vec<u8>, IngestError> {
    if is_remote(source) {
        let unreadable = |e: anyhow::Error| IngestError::Unreadable {
            source_name: source.to_string(),
            reason: e.to_string(),
        };
        let client = BasicClient::new().map_err(|e| unreadable(e.into()))?;
        return fetch_bytes(&client, source).await.map_err(unreadable);
    }

    tokio::fs::read(source).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => IngestError::NotFound(source.to_string()),
        _ => IngestError::Unreadable {
            source_name: source.to_string(),
            reason: e.to_string(),
        },
    })
}

/// Reads and parses the raw dataset at `source`.
pub async fn ingest(source: &str) -> Result<Vec<RawRecord>, IngestError> {
    info!(source, "Loading raw data");
    let bytes = load_source(source).await?;
    parse_raw(&bytes, source)
}

/// Runs the full pipeline: ingest, clean, persist.
#[tracing::instrument(skip(output), fields(output = %output.display()))]
pub async fn run(source: &str, output: &Path) -> Result<CleaningReport, PreprocessError> {
    let raw = ingest(source).await?;

    let (canonical, report) = clean(raw);
    log_report(&report);

    write_canonical(output, &canonical)?;
    info!("Pipeline executed successfully");
    Ok(report)
}

fn log_report(report: &CleaningReport) {
    if report.dropped_invalid_date > 0 {
        warn!(
            dropped = report.dropped_invalid_date,
            raw_rows = report.raw_rows,
            "Dropped rows with invalid release dates"
        );
    }
    if report.dropped_duplicate > 0 {
        warn!(
            dropped = report.dropped_duplicate,
            "Dropped rows repeating an earlier title and release date"
        );
    }

    info!(
        raw_rows = report.raw_rows,
        retained_movies = report.retained_movies,
        retention_pct = report.retention_pct(),
        defaulted_popularity = report.defaulted_popularity,
        defaulted_vote_count = report.defaulted_vote_count,
        defaulted_vote_average = report.defaulted_vote_average,
        unknown_language = report.unknown_language,
        unknown_genre = report.unknown_genre,
        canonical_rows = report.canonical_rows,
        explosion_factor = report.explosion_factor(),
        "Data cleaning complete"
    );
}
