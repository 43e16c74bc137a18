//! JSON file output.
//!
//! The file name carries the current date in Japan, the same
//! `<YYYYMMDD>_today.json` name used for the mail attachment, so a scheduled
//! run just after midnight JST files under the new day.

use crate::utils::today_file_name;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `payload` to `{output_dir}/{YYYYMMDD}_today.json`, creating the
/// directory if needed. Returns the written path.
#[instrument(level = "info", skip_all, fields(%output_dir))]
pub async fn write_today(
    payload: &Value,
    output_dir: &str,
    now: DateTime<Utc>,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(payload)?;

    info!("Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = Path::new(output_dir).join(today_file_name(now));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_today_creates_dated_file() {
        let dir = std::env::temp_dir().join(format!("tenki_weather_json_{}", std::process::id()));
        let dir_str = dir.to_string_lossy().to_string();
        let now = Utc.with_ymd_and_hms(2025, 10, 22, 3, 0, 0).unwrap();
        let payload = json!({ "rows": [{ "city": "Kitakyushu", "weather_text": "晴" }] });

        let path = write_today(&payload, &dir_str, now).await.unwrap();
        assert!(path.ends_with("20251022_today.json"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("晴"));
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, payload);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
