//! Runtime settings, read from the environment (and `.env` via `dotenvy`).

use std::path::PathBuf;

pub const PROJECT_NAME: &str = "Movie Analytics Platform";

/// Paths and addresses shared by the CLI subcommands and the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Raw dataset: a local path or an `http(s)://` URL.
    pub raw_data_path: String,
    /// Canonical store written by preprocessing and read by analytics.
    pub cleaned_data_path: PathBuf,
    pub bind_addr: String,
    pub api_prefix: String,
    pub log_file_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            raw_data_path: "data/raw_movies.csv".to_string(),
            cleaned_data_path: PathBuf::from("data/cleaned_movies.csv"),
            bind_addr: "127.0.0.1:8000".to_string(),
            api_prefix: "/api/v1".to_string(),
            log_file_path: "logs/movie_analytics.log".to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from process environment variables, falling back to
    /// [`Settings::default`] for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            raw_data_path: var("RAW_DATA_PATH").unwrap_or(defaults.raw_data_path),
            cleaned_data_path: var("CLEANED_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cleaned_data_path),
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            api_prefix: var("API_PREFIX")
                .map(|p| normalize_prefix(&p))
                .unwrap_or(defaults.api_prefix),
            log_file_path: var("LOG_FILE_PATH").unwrap_or(defaults.log_file_path),
        }
    }
}

/// Ensures a route prefix starts with `/` and has no trailing `/`.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("RAW_DATA_PATH", "https://example.org/movies.csv.gz"),
            ("CLEANED_DATA_PATH", "/tmp/cleaned.csv"),
            ("API_PREFIX", "api/v2/"),
            ("BIND_ADDR", "  "),
        ]);
        let settings = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(settings.raw_data_path, "https://example.org/movies.csv.gz");
        assert_eq!(settings.cleaned_data_path, PathBuf::from("/tmp/cleaned.csv"));
        assert_eq!(settings.api_prefix, "/api/v2");
        assert_eq!(settings.bind_addr, "127.0.0.1:8000");
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/api/v1"), "/api/v1");
        assert_eq!(normalize_prefix("/"), "");
    }
}
