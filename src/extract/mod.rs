//! Page-section extraction for the tenki.jp city forecast page.
//!
//! The forecast page exposes no stable ids for the blocks we care about, so
//! extraction works from anchor text outward:
//!
//! 1. **Anchors** ([`anchors`]): find `h3`/`h4` headings starting with `今日` or
//!    `明日`, or containing `10日間天気`, and resolve each heading's container
//! 2. **Daily fields** ([`daily`]): per-field marker search plus pattern match
//!    inside a today/tomorrow container
//! 3. **Outlook** ([`outlook`]): per-day boxes, or aligned token streams over the
//!    whole 10-day container
//! 4. **Assembly** ([`assemble`]): section labels, shared capture time and city
//!
//! Extraction never fails. Nothing found is an empty [`Extraction`], and the
//! caller decides how to report it.
//!
//! # Modes
//!
//! | Mode | Output |
//! |------|--------|
//! | `minimal` | `{t_max, t_min, wind_max}` for today |
//! | `daily` | `{rows}` with today and tomorrow |
//! | `full` | `{rows}` with today, tomorrow and the 10-day outlook |

pub mod anchors;
pub mod assemble;
pub mod daily;
pub mod outlook;
pub mod patterns;
pub mod region;

use crate::models::{ResultSet, TodayMinimal};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use scraper::Html;
use serde::Deserialize;

/// How much of the page to extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    Minimal,
    Daily,
    #[default]
    Full,
}

/// Result of one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Minimal(Option<TodayMinimal>),
    Rows(ResultSet),
}

impl Extraction {
    /// True when no section heading was located.
    pub fn is_empty(&self) -> bool {
        match self {
            Extraction::Minimal(m) => m.is_none(),
            Extraction::Rows(set) => set.is_empty(),
        }
    }

    /// JSON body as served over HTTP and attached to mail.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Extraction::Minimal(m) => serde_json::to_value(m),
            Extraction::Rows(set) => serde_json::to_value(set.to_rows()),
        }
    }
}

/// Parse `html` and extract according to `mode`.
pub fn extract(html: &str, mode: ExtractMode, city: &str, now: DateTime<Utc>) -> Extraction {
    let document = Html::parse_document(html);
    match mode {
        ExtractMode::Minimal => Extraction::Minimal(assemble::extract_minimal(&document)),
        ExtractMode::Daily => Extraction::Rows(assemble::assemble(&document, city, now, false)),
        ExtractMode::Full => Extraction::Rows(assemble::assemble(&document, city, now, true)),
    }
}
