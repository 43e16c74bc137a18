//! Utility functions for text normalization, time stamps and logging.
//!
//! This module provides helper functions used throughout the application:
//! - [`clean_text`], the one normalization applied before every text comparison
//! - Time stamps for the `runDate` field and the JST attachment file name
//! - String truncation for logging response previews

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Collapse every whitespace run (newlines and full-width spaces included)
/// to a single space and trim both ends.
///
/// Every marker search and pattern match in the extractor goes through this
/// function first. A fragment that skipped it would not match anchors like
/// `最高` when the page splits them across lines.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_text("  東の風\n\t 3m/s "), "東の風 3m/s");
/// ```
pub fn clean_text(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Format a capture time as the ISO-8601 UTC `runDate` label.
pub fn run_date_label(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `YYYYMMDD` for the given instant as seen in Japan (UTC+9).
///
/// Used for the mail attachment and one-shot output file names so that a run
/// shortly after midnight JST is filed under the new local day.
pub fn jst_date_stamp(now: DateTime<Utc>) -> String {
    (now + Duration::hours(9)).format("%Y%m%d").to_string()
}

/// File name for the day's JSON payload: `<YYYYMMDD>_today.json`.
pub fn today_file_name(now: DateTime<Utc>) -> String {
    format!("{}_today.json", jst_date_stamp(now))
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last character boundary before `max` bytes and
/// get a `"…(+N bytes)"` suffix.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
