//! Persistence for the canonical dataset and JSON output for query results.
//!
//! The canonical store is always replaced whole: rows are written to a
//! sibling temp file which is then renamed over the target, so a reader sees
//! either the previous snapshot or the new one.

use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::preprocess::types::CanonicalRecord;

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "canonical.csv".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes the canonical rows to `path`, replacing any previous dataset.
///
/// Creates parent directories as needed. Columns follow the field order of
/// [`CanonicalRecord`].
pub fn write_canonical(path: &Path, records: &[CanonicalRecord]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path_for(path);
    debug!(path = %tmp.display(), rows = records.len(), "Writing canonical dataset");

    let result = (|| -> Result<(), StoreError> {
        let file = File::create(&tmp)?;
        let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))?;
        file.sync_all()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    info!(path = %path.display(), rows = records.len(), "Canonical dataset saved");
    Ok(())
}

/// Reads the canonical dataset written by [`write_canonical`].
///
/// # Errors
///
/// [`StoreError::NotFound`] if nothing has been persisted at `path` yet,
/// [`StoreError::Csv`] if a row does not match the canonical schema.
pub fn load_canonical(path: &Path) -> Result<Vec<CanonicalRecord>, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }

    let mut rdr = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: CanonicalRecord = result?;
        rows.push(record);
    }

    info!(path = %path.display(), rows = rows.len(), "Canonical dataset loaded");
    Ok(rows)
}

/// Writes query rows to `out` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut out: W, rows: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, rows)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(title: &str, genre: &str) -> CanonicalRecord {
        CanonicalRecord {
            title: title.to_string(),
            release_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            popularity: 10.5,
            vote_count: 100,
            vote_average: 8.0,
            genre: genre.to_string(),
            original_language: "en".to_string(),
        }
    }

    #[test]
    fn test_write_canonical_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/cleaned.csv");

        write_canonical(&path, &[record("A", "Drama")]).unwrap();

        assert!(path.exists());
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_write_canonical_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");

        write_canonical(&path, &[record("A", "Drama")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("title,release_date,popularity,vote_count,vote_average,genre,original_language")
        );
        assert_eq!(lines.next(), Some("A,2020-01-01,10.5,100,8.0,Drama,en"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_canonical_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");

        write_canonical(&path, &[record("A", "Drama"), record("A", "Comedy")]).unwrap();
        write_canonical(&path, &[record("B", "Horror")]).unwrap();

        let rows = load_canonical(&path).unwrap();
        assert_eq!(rows, vec![record("B", "Horror")]);
    }

    #[test]
    fn test_write_canonical_failed_rename_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "x").unwrap();

        let err = write_canonical(&path, &[record("A", "Drama")]).unwrap_err();

        assert!(matches!(err, StoreError::Io(_)));
        assert!(!temp_path_for(&path).exists());
        assert!(path.join("occupied").exists());
    }

    #[test]
    fn test_load_canonical_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_canonical(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_load_canonical_rejects_bad_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        fs::write(
            &path,
            "title,release_date,popularity,vote_count,vote_average,genre,original_language\nA,nope,1.0,1,1.0,Drama,en\n",
        )
        .unwrap();

        let err = load_canonical(&path).unwrap_err();
        assert!(matches!(err, StoreError::Csv(_)));
    }

    #[test]
    fn test_write_json_does_not_panic() {
        let mut buf = Vec::new();
        write_json(&mut buf, &[record("A", "Drama")]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"title\": \"A\""));
        assert!(text.ends_with('\n'));
    }
}
