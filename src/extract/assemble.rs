//! Run Assembler: composes the anchor locator and both field extractors into
//! one [`ResultSet`].

use super::anchors::{Marker, locate_sections};
use super::daily::extract_daily;
use super::outlook::extract_outlook;
use crate::models::{Record, ResultSet, TodayMinimal};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html};
use tracing::info;

/// Build every record of one run.
///
/// The first two today/tomorrow headings (by document order, one per
/// container) become the `today` and `tomorrow` records, by position. The
/// first 10-day heading, when `include_outlook` is set, contributes one record
/// per discovered date. A document with no recognized heading yields an empty
/// set.
pub fn assemble(
    document: &Html,
    city: &str,
    now: DateTime<Utc>,
    include_outlook: bool,
) -> ResultSet {
    let anchors = locate_sections(document);
    let mut records = Vec::new();
    let mut containers: Vec<ElementRef<'_>> = Vec::new();

    for anchor in anchors.iter().filter(|a| a.marker.is_daily()) {
        if containers.iter().any(|c| c.id() == anchor.container.id()) {
            continue;
        }
        if containers.len() == 2 {
            break;
        }
        containers.push(anchor.container);
        let record = extract_daily(anchor);
        if containers.len() == 1 {
            records.push(Record::Today(record));
        } else {
            records.push(Record::Tomorrow(record));
        }
    }
    let daily = records.len();

    if include_outlook {
        if let Some(anchor) = anchors.iter().find(|a| a.marker == Marker::Outlook) {
            records.extend(extract_outlook(anchor).into_iter().map(Record::TenDay));
        }
    }

    info!(
        anchors = anchors.len(),
        daily,
        outlook = records.len() - daily,
        %city,
        "Assembled result set"
    );
    ResultSet {
        run_timestamp: now,
        city: city.to_string(),
        records,
    }
}

/// Today-only `{t_max, t_min, wind_max}` from the first `今日` heading.
pub fn extract_minimal(document: &Html) -> Option<TodayMinimal> {
    locate_sections(document)
        .iter()
        .find(|a| a.marker == Marker::Today)
        .map(|a| TodayMinimal::from(&extract_daily(a)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;
    use chrono::TimeZone;

    const PAGE: &str = r#"
        <html><body>
          <section><h3>今日 10月22日(水)</h3><p>晴</p><p>最高 28 ℃</p><p>最低 19 ℃</p></section>
          <section><h3>明日 10月23日(木)</h3><p>雨</p><p>最高 21 ℃</p><p>最低 16 ℃</p></section>
          <div>
            <h3>10日間天気</h3>
            <ul>
              <li><span>10月24日</span><img alt="曇"><p>20℃</p><p>14℃</p><p>40%</p></li>
              <li><span>10月25日</span><img alt="晴"><p>22℃</p><p>13℃</p><p>10%</p></li>
            </ul>
          </div>
        </body></html>"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 22, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_document_yields_empty_set() {
        let doc = Html::parse_document("<html><body><p>メンテナンス中</p></body></html>");
        let set = assemble(&doc, "Kitakyushu", now(), true);
        assert!(set.is_empty());
        assert_eq!(set.city, "Kitakyushu");
        assert!(extract_minimal(&doc).is_none());
    }

    #[test]
    fn test_sections_in_order_with_shared_stamp() {
        let doc = Html::parse_document(PAGE);
        let set = assemble(&doc, "Kitakyushu", now(), true);
        let sections: Vec<Section> = set.records.iter().map(Record::section).collect();
        assert_eq!(
            sections,
            vec![Section::Today, Section::Tomorrow, Section::TenDay, Section::TenDay]
        );

        let rows = set.to_rows().rows;
        assert!(rows.iter().all(|r| r.runDate == "2025-10-22T00:00:00Z"));
        assert!(rows.iter().all(|r| r.city == "Kitakyushu"));
        assert_eq!(rows[0].t_max.as_deref(), Some("28"));
        assert_eq!(rows[0].t_min.as_deref(), Some("19"));
        assert_eq!(rows[1].date, "10月23日");
        assert_eq!(rows[1].weather_text, "雨");
        assert_eq!(rows[2].date, "10月24日");
        assert_eq!(rows[2].notes, "40%");
        assert_eq!(rows[3].t_min.as_deref(), Some("13"));
    }

    #[test]
    fn test_daily_only_skips_outlook() {
        let doc = Html::parse_document(PAGE);
        let set = assemble(&doc, "Kitakyushu", now(), false);
        assert_eq!(set.records.len(), 2);
    }

    #[test]
    fn test_at_most_two_daily_records() {
        let doc = Html::parse_document(
            "<div><h3>今日</h3></div><div><h3>明日</h3></div><div><h3>今日の注意</h3></div>",
        );
        let set = assemble(&doc, "Kitakyushu", now(), true);
        assert_eq!(set.records.len(), 2);
        assert_eq!(set.records[1].section(), Section::Tomorrow);
    }

    #[test]
    fn test_headings_sharing_a_container_count_once() {
        let doc = Html::parse_document(
            "<div><h3>今日</h3><h4>今日の詳細</h4><p>晴</p></div><div><h3>明日</h3><p>雪</p></div>",
        );
        let set = assemble(&doc, "Kitakyushu", now(), false);
        assert_eq!(set.records.len(), 2);
        match &set.records[1] {
            Record::Tomorrow(r) => assert_eq!(r.weather_text, "雪"),
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn test_extract_minimal_from_today() {
        let doc = Html::parse_document(
            "<div><h3>今日</h3><p>最高 28 ℃</p><p>最低 19 ℃</p><p>最大風速 東の風 3m/s</p></div>",
        );
        let minimal = extract_minimal(&doc).unwrap();
        assert_eq!(minimal.t_max.as_deref(), Some("28"));
        assert_eq!(minimal.t_min.as_deref(), Some("19"));
        assert_eq!(minimal.wind_max.as_deref(), Some("東の風 3m/s"));
    }
}
