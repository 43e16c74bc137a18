//! Field Extractor for the today and tomorrow sections.
//!
//! Each field is found independently: locate the fragment carrying its marker
//! text, then match a pattern in the surrounding text. A layout change that
//! breaks one field leaves the others intact, and a missing field is recorded
//! as absent/empty rather than failing the record.

use super::anchors::Anchor;
use super::patterns::{first_clock, first_date, has_weather_char, leading_celsius, percent_tokens};
use super::region::{Region, element_text};
use crate::models::{PrecipBands, WeatherRecord};
use tracing::debug;

pub const MARKER_HIGH: &str = "最高";
pub const MARKER_LOW: &str = "最低";
pub const MARKER_SUNRISE: &str = "日の出";
pub const MARKER_SUNSET: &str = "日の入";
pub const MARKER_PRECIP: &str = "降水確率";
pub const MARKER_WIND: &str = "最大風速";

const FIELD_MARKERS: [&str; 6] = [
    MARKER_HIGH,
    MARKER_LOW,
    MARKER_SUNRISE,
    MARKER_SUNSET,
    MARKER_PRECIP,
    MARKER_WIND,
];

/// Reduce a located today/tomorrow section to a [`WeatherRecord`].
pub fn extract_daily(anchor: &Anchor<'_>) -> WeatherRecord {
    let region = anchor.region();
    let record = WeatherRecord {
        date: date_label(&anchor.title),
        weather_text: weather_text(&region),
        temp_max: temperature(&region, MARKER_HIGH),
        temp_min: temperature(&region, MARKER_LOW),
        wind_max: wind(&region),
        sunrise: clock_time(&region, MARKER_SUNRISE),
        sunset: clock_time(&region, MARKER_SUNSET),
        precip: precip_bands(&region),
    };
    debug!(title = %anchor.title, ?record, "Extracted daily section");
    record
}

/// `<digits>月<digits>日` from the heading title, else the whole title.
pub fn date_label(title: &str) -> String {
    first_date(title).unwrap_or_else(|| title.to_string())
}

/// First fragment mentioning clear/cloudy/rain/snow.
pub fn weather_text(region: &Region<'_>) -> String {
    region
        .fragments()
        .into_iter()
        .find(|f| has_weather_char(&f.text))
        .map(|f| f.text)
        .unwrap_or_default()
}

/// Text after `marker`, cut where the next field's marker begins.
fn field_value(region: &Region<'_>, marker: &str) -> Option<String> {
    let tail = region.text_after(marker)?;
    let end = FIELD_MARKERS
        .iter()
        .filter_map(|m| tail.find(m))
        .min()
        .unwrap_or(tail.len());
    Some(tail[..end].trim().to_string())
}

/// Signed Celsius value directly after the marker; absent otherwise.
pub fn temperature(region: &Region<'_>, marker: &str) -> Option<String> {
    leading_celsius(&field_value(region, marker)?)
}

/// `HH時MM分` next to the sunrise or sunset marker; empty if not found.
pub fn clock_time(region: &Region<'_>, marker: &str) -> String {
    field_value(region, marker)
        .and_then(|value| first_clock(&value))
        .unwrap_or_default()
}

/// The whole wind phrase after the marker, kept verbatim.
pub fn wind(region: &Region<'_>) -> String {
    field_value(region, MARKER_WIND).unwrap_or_default()
}

/// Four percentages from the precipitation row, or four empty bands.
pub fn precip_bands(region: &Region<'_>) -> PrecipBands {
    let Some(row) = region.row_of(MARKER_PRECIP) else {
        return PrecipBands::default();
    };
    let tokens = percent_tokens(&element_text(row));
    if tokens.len() != 4 {
        debug!(count = tokens.len(), "Precipitation row does not have four bands; discarding");
    }
    PrecipBands::from_tokens(&tokens)
}
