//! Anchor Locator: finds section headings by their text and resolves the
//! container that holds each heading's content block.
//!
//! The forecast page has no stable ids for the today/tomorrow/10-day blocks,
//! so headings are recognized by a short marker at the start of (or inside)
//! their cleaned title. Finding nothing is a valid outcome, not an error.

use super::region::{Region, parent_element};
use crate::utils::clean_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static HEADINGS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3, h4").expect("heading selector"));

/// Which kind of section a heading introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Today,
    Tomorrow,
    Outlook,
}

impl Marker {
    pub fn is_daily(self) -> bool {
        matches!(self, Marker::Today | Marker::Tomorrow)
    }
}

/// A located heading and the container of its content.
#[derive(Debug, Clone)]
pub struct Anchor<'a> {
    pub marker: Marker,
    /// Cleaned heading text, e.g. `今日 10月22日(火)`.
    pub title: String,
    pub heading: ElementRef<'a>,
    pub container: ElementRef<'a>,
}

impl<'a> Anchor<'a> {
    pub fn region(&self) -> Region<'a> {
        Region::new(self.container, self.heading)
    }
}

/// Classify a cleaned heading title by the section marker it carries.
pub fn classify_heading(title: &str) -> Option<Marker> {
    if title.starts_with("今日") {
        Some(Marker::Today)
    } else if title.starts_with("明日") {
        Some(Marker::Tomorrow)
    } else if title.contains("10日間天気") {
        Some(Marker::Outlook)
    } else {
        None
    }
}

/// Locate every heading accepted by `classify`, in document order.
///
/// The container is the heading's parent element; a heading without an
/// enclosing element is its own container.
pub fn locate<'a, F>(document: &'a Html, classify: F) -> Vec<Anchor<'a>>
where
    F: Fn(&str) -> Option<Marker>,
{
    document
        .select(&HEADINGS)
        .filter_map(|heading| {
            let title = clean_text(&heading.text().collect::<String>());
            let marker = classify(&title)?;
            let container = parent_element(heading).unwrap_or(heading);
            debug!(?marker, %title, container = container.value().name(), "Located section heading");
            Some(Anchor {
                marker,
                title,
                heading,
                container,
            })
        })
        .collect()
}

/// [`locate`] with the today/tomorrow/10-day markers.
pub fn locate_sections(document: &Html) -> Vec<Anchor<'_>> {
    locate(document, classify_heading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_heading() {
        assert_eq!(classify_heading("今日 10月22日(火)"), Some(Marker::Today));
        assert_eq!(classify_heading("明日 10月23日(水)"), Some(Marker::Tomorrow));
        assert_eq!(classify_heading("北九州市の10日間天気"), Some(Marker::Outlook));
        assert_eq!(classify_heading("週間天気"), None);
        assert_eq!(classify_heading("きょう 今日"), None);
    }

    #[test]
    fn test_no_matching_heading_is_empty() {
        let doc = Html::parse_document("<div><h3>お知らせ</h3><p>晴</p></div>");
        assert!(locate_sections(&doc).is_empty());
    }

    #[test]
    fn test_locate_in_document_order_with_parent_container() {
        let doc = Html::parse_document(
            r#"<section id="t"><h3>
                今日
                10月22日</h3><p>晴</p></section>
               <section id="m"><h3>明日 10月23日</h3></section>
               <div id="o"><h4>10日間天気</h4></div>"#,
        );
        let anchors = locate_sections(&doc);
        let markers: Vec<Marker> = anchors.iter().map(|a| a.marker).collect();
        assert_eq!(markers, vec![Marker::Today, Marker::Tomorrow, Marker::Outlook]);
        assert_eq!(anchors[0].title, "今日 10月22日");
        assert_eq!(anchors[0].container.value().attr("id"), Some("t"));
        assert_eq!(anchors[2].container.value().attr("id"), Some("o"));
    }

    #[test]
    fn test_custom_classifier() {
        let doc = Html::parse_document("<div><h3>今日</h3><h3>明日</h3></div>");
        let only_tomorrow = locate(&doc, |t| t.starts_with("明日").then_some(Marker::Tomorrow));
        assert_eq!(only_tomorrow.len(), 1);
        assert_eq!(only_tomorrow[0].title, "明日");
    }
}
