//! CSV parser for the raw movie dataset.

use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

use crate::error::IngestError;
use crate::preprocess::types::RawRecord;

/// Columns the cleaner cannot work without, in header spelling.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "title",
    "release_date",
    "popularity",
    "vote_count",
    "vote_average",
    "genres",
    "original_language",
];

/// Positions of the known columns within a source's header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    title: usize,
    release_date: usize,
    popularity: usize,
    vote_count: usize,
    vote_average: usize,
    genres: usize,
    original_language: usize,
    overview: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self, IngestError> {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |name: &str| names.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(IngestError::MissingColumn(name));

        Ok(Self {
            title: require("title")?,
            release_date: require("release_date")?,
            popularity: require("popularity")?,
            vote_count: require("vote_count")?,
            vote_average: require("vote_average")?,
            genres: find("genres")
                .or_else(|| find("genre"))
                .ok_or(IngestError::MissingColumn("genres"))?,
            original_language: require("original_language")?,
            overview: find("overview"),
        })
    }

    fn extract(&self, record: &StringRecord) -> RawRecord {
        let cell = |idx: usize| {
            record
                .get(idx)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        RawRecord {
            title: cell(self.title),
            release_date: cell(self.release_date),
            popularity: cell(self.popularity),
            vote_count: cell(self.vote_count),
            vote_average: cell(self.vote_average),
            genres: cell(self.genres),
            original_language: cell(self.original_language),
            overview: self.overview.and_then(cell),
        }
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_ascii_lowercase()
}

/// Decodes raw dataset bytes into [`RawRecord`]s.
///
/// Sources whose name ends in `.gz` are gunzipped first. Header names are
/// matched case-insensitively and extra columns are ignored. Short rows are
/// tolerated; their missing cells read as `None`.
///
/// # Errors
///
/// Returns [`IngestError::MissingColumn`] if a required column is absent, or
/// [`IngestError::Unreadable`] if the bytes are not valid gzip/UTF-8 CSV.
pub fn parse_raw(bytes: &[u8], source_name: &str) -> Result<Vec<RawRecord>, IngestError> {
    let unreadable = |reason: String| IngestError::Unreadable {
        source_name: source_name.to_string(),
        reason,
    };

    let decompressed;
    let input: &[u8] = if source_name.ends_with(".gz") {
        let mut buf = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut buf)
            .map_err(|e| unreadable(format!("gzip: {e}")))?;
        decompressed = buf;
        &decompressed
    } else {
        bytes
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = rdr.headers().map_err(|e| unreadable(e.to_string()))?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| unreadable(e.to_string()))?;
        rows.push(columns.extract(&record));
    }

    debug!(source = source_name, rows = rows.len(), "Raw dataset parsed");
    Ok(rows)
}
