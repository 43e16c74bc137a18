//! Error types for the scrape pipeline and the mail surface.
//!
//! Field-level absence is never an error: a missing temperature or wind
//! descriptor is recorded as absent/empty on the record. Only transport
//! failures and "no section found at all" surface here.

use thiserror::Error;

/// Failures of the fetch → parse → extract pipeline.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network/transport error or non-success status from the source page.
    #[error("fetch_failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// A caller-supplied URL override did not parse.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// No today/tomorrow/10-day heading was found in the document.
    #[error("parse_failed_or_structure_changed")]
    StructureChanged,
}

/// Failures of the email delivery surface.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing mail setting {0} (SMTP_HOST/SMTP_PORT/SMTP_USER/SMTP_PASS/TO_ADDR)")]
    MissingConfig(&'static str),

    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("invalid content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("failed to encode payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not obtain today's data: {0}")]
    Source(String),
}

impl From<ScrapeError> for MailError {
    fn from(e: ScrapeError) -> Self {
        MailError::Source(e.to_string())
    }
}
