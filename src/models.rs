//! Data models for extracted forecast records and their JSON representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`WeatherRecord`]: one today/tomorrow section with its four precipitation bands
//! - [`OutlookRecord`]: one day of the 10-day outlook
//! - [`ResultSet`]: every record of a run, stamped with capture time and city
//! - [`FlatRow`] / [`Rows`]: the fixed-key wire format served over HTTP and mailed
//! - [`TodayMinimal`]: the today-only `{t_max, t_min, wind_max}` variant
//!
//! The wire structs use the exact JSON key names consumers expect (`runDate`
//! included), hence the `#[allow(non_snake_case)]` attributes.

use crate::utils::run_date_label;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which heading a record was located under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "tomorrow")]
    Tomorrow,
    #[serde(rename = "10day")]
    TenDay,
}

/// Precipitation probability for the four fixed six-hour bands.
///
/// The key set never varies. A band is an empty string when the row could not
/// be read as exactly four percentages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecipBands {
    pub h00_06: String,
    pub h06_12: String,
    pub h12_18: String,
    pub h18_24: String,
}

impl PrecipBands {
    /// Assign four tokens in document order; any other count yields all-empty bands.
    pub fn from_tokens(tokens: &[String]) -> Self {
        match tokens {
            [a, b, c, d] => Self {
                h00_06: a.clone(),
                h06_12: b.clone(),
                h12_18: c.clone(),
                h18_24: d.clone(),
            },
            _ => Self::default(),
        }
    }
}

/// Extracted fields of a today or tomorrow section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherRecord {
    /// Localized calendar label such as `10月22日`, or the whole heading title.
    pub date: String,
    pub weather_text: String,
    /// Degrees Celsius as captured from the page (`28`, `-3`, `+5`); `None`
    /// when the page had no readable value.
    pub temp_max: Option<String>,
    pub temp_min: Option<String>,
    /// Verbatim wind phrase, e.g. `東の風 3m/s`.
    pub wind_max: String,
    pub sunrise: String,
    pub sunset: String,
    pub precip: PrecipBands,
}

/// One day of the 10-day outlook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlookRecord {
    pub date: String,
    pub weather_text: String,
    pub temp_max: Option<String>,
    pub temp_min: Option<String>,
    /// Single percentage label such as `30%`, or empty.
    pub precip_prob: String,
}

/// A record tagged with the section it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Today(WeatherRecord),
    Tomorrow(WeatherRecord),
    TenDay(OutlookRecord),
}

impl Record {
    pub fn section(&self) -> Section {
        match self {
            Record::Today(_) => Section::Today,
            Record::Tomorrow(_) => Section::Tomorrow,
            Record::TenDay(_) => Section::TenDay,
        }
    }
}

/// Every record produced by one extraction call.
///
/// Built fresh on every call and never mutated after it is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    pub run_timestamp: DateTime<Utc>,
    pub city: String,
    pub records: Vec<Record>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flatten into the fixed-key wire rows, preserving record order.
    pub fn to_rows(&self) -> Rows {
        let run_date = run_date_label(self.run_timestamp);
        let rows = self
            .records
            .iter()
            .map(|record| FlatRow::from_record(&run_date, &self.city, record))
            .collect();
        Rows { rows }
    }
}

/// One flat output row. Fields that do not apply to a section are empty strings;
/// absent temperatures are `null`.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRow {
    /// Capture time, ISO-8601 UTC.
    pub runDate: String,
    pub city: String,
    pub section: Section,
    pub date: String,
    pub weather_text: String,
    pub t_max: Option<String>,
    pub t_min: Option<String>,
    pub pop_00_06: String,
    pub pop_06_12: String,
    pub pop_12_18: String,
    pub pop_18_24: String,
    pub wind_max: String,
    pub sunrise: String,
    pub sunset: String,
    /// Raw percentage token of a 10-day row, kept for traceability.
    pub notes: String,
}

impl FlatRow {
    fn from_record(run_date: &str, city: &str, record: &Record) -> Self {
        let mut row = FlatRow {
            runDate: run_date.to_string(),
            city: city.to_string(),
            section: record.section(),
            date: String::new(),
            weather_text: String::new(),
            t_max: None,
            t_min: None,
            pop_00_06: String::new(),
            pop_06_12: String::new(),
            pop_12_18: String::new(),
            pop_18_24: String::new(),
            wind_max: String::new(),
            sunrise: String::new(),
            sunset: String::new(),
            notes: String::new(),
        };

        match record {
            Record::Today(r) | Record::Tomorrow(r) => {
                row.date = r.date.clone();
                row.weather_text = r.weather_text.clone();
                row.t_max = r.temp_max.clone();
                row.t_min = r.temp_min.clone();
                row.pop_00_06 = r.precip.h00_06.clone();
                row.pop_06_12 = r.precip.h06_12.clone();
                row.pop_12_18 = r.precip.h12_18.clone();
                row.pop_18_24 = r.precip.h18_24.clone();
                row.wind_max = r.wind_max.clone();
                row.sunrise = r.sunrise.clone();
                row.sunset = r.sunset.clone();
            }
            Record::TenDay(r) => {
                row.date = r.date.clone();
                row.weather_text = r.weather_text.clone();
                row.t_max = r.temp_max.clone();
                row.t_min = r.temp_min.clone();
                row.notes = r.precip_prob.clone();
            }
        }
        row
    }
}

/// The `{ "rows": [...] }` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rows {
    pub rows: Vec<FlatRow>,
}

/// Today-only minimal payload: exactly `t_max`, `t_min` and `wind_max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayMinimal {
    pub t_max: Option<String>,
    pub t_min: Option<String>,
    pub wind_max: Option<String>,
}

impl From<&WeatherRecord> for TodayMinimal {
    fn from(r: &WeatherRecord) -> Self {
        TodayMinimal {
            t_max: r.temp_max.clone(),
            t_min: r.temp_min.clone(),
            wind_max: Some(r.wind_max.clone()).filter(|w| !w.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_set() -> ResultSet {
        ResultSet {
            run_timestamp: Utc.with_ymd_and_hms(2025, 10, 22, 0, 30, 0).unwrap(),
            city: "Kitakyushu".to_string(),
            records: vec![
                Record::Today(WeatherRecord {
                    date: "10月22日".to_string(),
                    weather_text: "晴のち曇".to_string(),
                    temp_max: Some("28".to_string()),
                    temp_min: Some("-1".to_string()),
                    wind_max: "東の風 3m/s".to_string(),
                    sunrise: "06時15分".to_string(),
                    sunset: "17時40分".to_string(),
                    precip: PrecipBands::from_tokens(&[
                        "20%".to_string(),
                        "20%".to_string(),
                        "20%".to_string(),
                        "0%".to_string(),
                    ]),
                }),
                Record::TenDay(OutlookRecord {
                    date: "10月24日".to_string(),
                    weather_text: "雨".to_string(),
                    temp_max: None,
                    temp_min: Some("15".to_string()),
                    precip_prob: "80%".to_string(),
                }),
            ],
        }
    }

    #[test]
    fn test_precip_bands_requires_exactly_four_tokens() {
        let three: Vec<String> = ["10%", "20%", "30%"].iter().map(|s| s.to_string()).collect();
        assert_eq!(PrecipBands::from_tokens(&three), PrecipBands::default());

        let five: Vec<String> = ["1%", "2%", "3%", "4%", "5%"].iter().map(|s| s.to_string()).collect();
        assert_eq!(PrecipBands::from_tokens(&five), PrecipBands::default());

        let four: Vec<String> = ["20%", "20%", "20%", "0%"].iter().map(|s| s.to_string()).collect();
        let bands = PrecipBands::from_tokens(&four);
        assert_eq!(bands.h00_06, "20%");
        assert_eq!(bands.h06_12, "20%");
        assert_eq!(bands.h12_18, "20%");
        assert_eq!(bands.h18_24, "0%");
    }

    #[test]
    fn test_section_serialization() {
        assert_eq!(serde_json::to_string(&Section::TenDay).unwrap(), "\"10day\"");
        assert_eq!(serde_json::to_string(&Section::Today).unwrap(), "\"today\"");
    }

    #[test]
    fn test_rows_have_fixed_key_set() {
        let rows = sample_set().to_rows();
        let value = serde_json::to_value(&rows).unwrap();
        let keys = [
            "runDate", "city", "section", "date", "weather_text", "t_max", "t_min",
            "pop_00_06", "pop_06_12", "pop_12_18", "pop_18_24", "wind_max", "sunrise",
            "sunset", "notes",
        ];
        for row in value["rows"].as_array().unwrap() {
            let obj = row.as_object().unwrap();
            assert_eq!(obj.len(), keys.len());
            for key in keys {
                assert!(obj.contains_key(key), "missing {key}");
            }
        }
    }

    #[test]
    fn test_flat_rows_fill_section_specific_fields() {
        let rows = sample_set().to_rows().rows;
        assert_eq!(rows[0].runDate, "2025-10-22T00:30:00Z");
        assert_eq!(rows[0].section, Section::Today);
        assert_eq!(rows[0].t_min.as_deref(), Some("-1"));
        assert_eq!(rows[0].pop_18_24, "0%");
        assert_eq!(rows[0].notes, "");

        assert_eq!(rows[1].section, Section::TenDay);
        assert_eq!(rows[1].t_max, None);
        assert_eq!(rows[1].pop_00_06, "");
        assert_eq!(rows[1].wind_max, "");
        assert_eq!(rows[1].notes, "80%");
    }

    #[test]
    fn test_rows_round_trip_keeps_null_vs_empty() {
        let rows = sample_set().to_rows();
        let json = serde_json::to_string(&rows).unwrap();
        assert!(json.contains("\"t_max\":null"));
        assert!(json.contains("\"wind_max\":\"\""));

        let parsed: Rows = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rows);
        assert_eq!(parsed.rows[1].t_max, None);
        assert_eq!(parsed.rows[1].sunrise, "");
    }

    #[test]
    fn test_today_minimal_from_record() {
        let record = WeatherRecord {
            temp_max: Some("28".to_string()),
            temp_min: None,
            ..WeatherRecord::default()
        };
        let minimal = TodayMinimal::from(&record);
        assert_eq!(minimal.t_max.as_deref(), Some("28"));
        assert_eq!(minimal.t_min, None);
        assert_eq!(minimal.wind_max, None);

        let json = serde_json::to_value(&minimal).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 3);
        assert!(json["wind_max"].is_null());
    }
}
