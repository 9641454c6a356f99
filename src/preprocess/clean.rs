//! Cleaning, coercion and genre explosion.
//!
//! Everything here is pure: the same raw rows always produce the same
//! canonical rows, in the same order, with the same report.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::preprocess::types::{
    CanonicalRecord, FieldOutcome, RawRecord, UNKNOWN_GENRE, UNKNOWN_LANGUAGE,
};
use crate::stats::CleaningReport;

/// The only accepted `release_date` encoding.
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a release date. Unparseable dates drop the row.
pub fn normalize_date(raw: Option<&str>) -> FieldOutcome<NaiveDate> {
    match raw.map(str::trim) {
        Some(s) => match NaiveDate::parse_from_str(s, RELEASE_DATE_FORMAT) {
            Ok(date) => FieldOutcome::Value(date),
            Err(_) => FieldOutcome::Dropped,
        },
        None => FieldOutcome::Dropped,
    }
}

/// Parses a non-negative real number. Anything else is defaulted.
pub fn coerce_f64(raw: Option<&str>) -> FieldOutcome<f64> {
    match raw.map(str::trim).map(str::parse::<f64>) {
        Some(Ok(v)) if v.is_finite() && v >= 0.0 => FieldOutcome::Value(v),
        _ => FieldOutcome::Defaulted,
    }
}

/// Parses a non-negative whole number, accepting float spellings such as
/// `"120.0"`. Fractional or negative counts are defaulted.
pub fn coerce_count(raw: Option<&str>) -> FieldOutcome<u64> {
    let Some(s) = raw.map(str::trim) else {
        return FieldOutcome::Defaulted;
    };
    if let Ok(v) = s.parse::<u64>() {
        return FieldOutcome::Value(v);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => {
            FieldOutcome::Value(v as u64)
        }
        _ => FieldOutcome::Defaulted,
    }
}

/// Splits a comma-separated genre list into trimmed, de-duplicated names in
/// declared order. An empty list yields `None`.
pub fn split_genres(raw: Option<&str>) -> Option<Vec<String>> {
    let mut genres: Vec<String> = Vec::new();
    for token in raw.unwrap_or_default().split(',') {
        let token = token.trim();
        if !token.is_empty() && !genres.iter().any(|g| g == token) {
            genres.push(token.to_string());
        }
    }
    if genres.is_empty() { None } else { Some(genres) }
}

/// Trims and lowercases a language code.
pub fn normalize_language(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// Turns raw rows into genre-exploded canonical rows plus a run report.
///
/// Rows with an invalid date are dropped, as are repeats of an already-seen
/// `(title, release_date)` identity. Invalid numeric fields become 0.
/// A movie with no genres is tagged [`UNKNOWN_GENRE`] and a missing language
/// becomes [`UNKNOWN_LANGUAGE`].
pub fn clean(raw: Vec<RawRecord>) -> (Vec<CanonicalRecord>, CleaningReport) {
    let mut report = CleaningReport {
        raw_rows: raw.len(),
        ..Default::default()
    };
    let mut out = Vec::with_capacity(raw.len());
    let mut seen: HashSet<(String, NaiveDate)> = HashSet::new();

    for row in raw {
        let release_date = match normalize_date(row.release_date.as_deref()) {
            FieldOutcome::Value(date) => date,
            _ => {
                report.dropped_invalid_date += 1;
                continue;
            }
        };

        let title = row.title.map(|t| t.trim().to_string()).unwrap_or_default();
        if !seen.insert((title.clone(), release_date)) {
            report.dropped_duplicate += 1;
            continue;
        }

        let popularity = coerce_f64(row.popularity.as_deref());
        let vote_count = coerce_count(row.vote_count.as_deref());
        let vote_average = coerce_f64(row.vote_average.as_deref());

        if popularity.is_defaulted() {
            report.defaulted_popularity += 1;
        }
        if vote_count.is_defaulted() {
            report.defaulted_vote_count += 1;
        }
        if vote_average.is_defaulted() {
            report.defaulted_vote_average += 1;
        }

        let original_language = normalize_language(row.original_language.as_deref())
            .unwrap_or_else(|| {
                report.unknown_language += 1;
                UNKNOWN_LANGUAGE.to_string()
            });

        let genres = split_genres(row.genres.as_deref()).unwrap_or_else(|| {
            report.unknown_genre += 1;
            vec![UNKNOWN_GENRE.to_string()]
        });

        let popularity = popularity.resolve().unwrap_or_default();
        let vote_count = vote_count.resolve().unwrap_or_default();
        let vote_average = vote_average.resolve().unwrap_or_default();

        report.retained_movies += 1;

        for genre in genres {
            out.push(CanonicalRecord {
                title: title.clone(),
                release_date,
                popularity,
                vote_count,
                vote_average,
                genre,
                original_language: original_language.clone(),
            });
        }
    }

    report.canonical_rows = out.len();
    (out, report)
}
