//! Remote retrieval of raw datasets.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;

/// Returns `true` when `source` should be fetched over HTTP rather than read
/// from the local filesystem.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Downloads the body at `url`, failing on non-success status codes.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.org/movies.csv"));
        assert!(is_remote("http://localhost:9000/raw.csv.gz"));
        assert!(!is_remote("data/raw_movies.csv"));
        assert!(!is_remote("httpdata/raw.csv"));
    }
}
