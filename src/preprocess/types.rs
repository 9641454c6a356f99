//! Record types on either side of the cleaning step.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Genre assigned to a movie whose genre list is empty after trimming.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Language assigned when `original_language` is missing or blank.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// A single row of the raw dataset, exactly as encoded in the source.
///
/// Every field is optional text: blank cells and short rows both read as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub popularity: Option<String>,
    pub vote_count: Option<String>,
    pub vote_average: Option<String>,
    pub genres: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
}

/// One (movie, genre) row of the canonical dataset.
///
/// Field order here is the column order of the persisted store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub title: String,
    pub release_date: NaiveDate,
    pub popularity: f64,
    pub vote_count: u64,
    pub vote_average: f64,
    pub genre: String,
    pub original_language: String,
}

/// Result of coercing a single raw field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome<T> {
    /// The field parsed cleanly.
    Value(T),
    /// The field was missing or malformed and takes the default.
    Defaulted,
    /// The field was malformed and the whole row must be discarded.
    Dropped,
}

impl<T: Default> FieldOutcome<T> {
    /// Resolves to the parsed value or `T::default()`. `None` if the row is dropped.
    pub fn resolve(self) -> Option<T> {
        match self {
            FieldOutcome::Value(v) => Some(v),
            FieldOutcome::Defaulted => Some(T::default()),
            FieldOutcome::Dropped => None,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, FieldOutcome::Defaulted)
    }
}
