//! Forecast page scrapers.
//!
//! Each scraper follows the same two-phase pattern:
//!
//! 1. **Fetching**: download the page over HTTP with a fixed identity and timeout
//! 2. **Extracting**: parse the markup and hand it to [`crate::extract`]
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | tenki.jp | [`tenki`] | HTML scraping | One city forecast page; Kitakyushu by default |
//!
//! Transport failures are returned untouched as [`ScrapeError::Fetch`](crate::errors::ScrapeError);
//! a page with no recognizable section is [`ScrapeError::StructureChanged`](crate::errors::ScrapeError).

pub mod tenki;
