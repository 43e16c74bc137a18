//! tenki.jp city forecast scraper.
//!
//! Fetches one forecast page such as
//! `https://tenki.jp/forecast/9/43/8220/40100/` (Kitakyushu) and extracts the
//! today, tomorrow and 10-day sections from it.

use crate::errors::ScrapeError;
use crate::extract::{ExtractMode, Extraction, extract};
use chrono::Utc;
use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Forecast page scraped when no override is given.
pub const DEFAULT_URL: &str = "https://tenki.jp/forecast/9/43/8220/40100/";
/// City label stamped on every row by default.
pub const DEFAULT_CITY: &str = "Kitakyushu";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client with the fixed identity headers and timeout.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ja,en;q=0.8"));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// The underlying client, for callers fetching JSON with the same identity.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Download the page body. Non-success statuses are errors.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        debug!(%status, "Fetched forecast page");
        let body = response.error_for_status()?.text().await?;
        info!(bytes = body.len(), "Downloaded forecast page");
        Ok(body)
    }
}

/// Parse a caller-supplied URL override.
pub fn parse_url(raw: &str) -> Result<Url, ScrapeError> {
    Url::parse(raw).map_err(|source| ScrapeError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Fetch `url` and extract it in `mode`.
///
/// Returns [`ScrapeError::StructureChanged`] when no section heading was found.
#[instrument(level = "info", skip_all, fields(%url, ?mode, %city))]
pub async fn scrape(
    fetcher: &Fetcher,
    url: &Url,
    mode: ExtractMode,
    city: &str,
) -> Result<Extraction, ScrapeError> {
    let html = fetcher.fetch(url).await?;
    let extraction = extract(&html, mode, city, Utc::now());
    if extraction.is_empty() {
        warn!("No forecast section found; page layout may have changed");
        return Err(ScrapeError::StructureChanged);
    }
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url_parses() {
        let url = parse_url(DEFAULT_URL).unwrap();
        assert_eq!(url.host_str(), Some("tenki.jp"));
    }

    #[test]
    fn test_parse_url_rejects_garbage() {
        let err = parse_url("not a url").unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidUrl { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_fetcher_builds() {
        assert!(Fetcher::new().is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_failure() {
        let fetcher = Fetcher::new().unwrap();
        let url = Url::parse("http://127.0.0.1:9/forecast").unwrap();
        let err = scrape(&fetcher, &url, ExtractMode::Full, DEFAULT_CITY)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch(_)));
        assert!(err.to_string().starts_with("fetch_failed"));
    }
}
