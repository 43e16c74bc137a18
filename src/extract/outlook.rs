//! Field Extractor for the 10-day outlook.
//!
//! The outlook is read in one of two ways:
//!
//! 1. **Per-day boxes**: when every date sits in its own sub-element that
//!    also carries that day's weather image, temperatures or percentage, each
//!    day is read from its box alone. Stray numbers elsewhere in the container
//!    cannot shift other days.
//! 2. **Global streams** (best effort): dates, weather image alts, integer
//!    tokens and percentage tokens are scanned over the whole container and
//!    aligned by index. Temperatures are consumed two per day, high then low.
//!    Any extra number in the container shifts every later day; this mode is
//!    not guaranteed to be correct.
//!
//! Either way, output stops at the last discovered date and a missing value
//! is absent or empty rather than an index error.

use super::anchors::Anchor;
use super::patterns::{
    date_tokens, first_date, has_weather_char, loose_integers, percent_tokens,
};
use super::region::{Region, element_text, parent_element};
use crate::models::OutlookRecord;
use scraper::ElementRef;
use tracing::debug;

/// Reduce the located 10-day container to one record per discovered date.
pub fn extract_outlook(anchor: &Anchor<'_>) -> Vec<OutlookRecord> {
    let region = anchor.region();
    match day_boxes(&region) {
        Some(boxes) => {
            debug!(days = boxes.len(), "Reading outlook from per-day boxes");
            boxes.into_iter().map(read_day_box).collect()
        }
        None => {
            let records = read_global_streams(&region);
            debug!(days = records.len(), "Reading outlook from global token streams");
            records
        }
    }
}

fn date_count(element: ElementRef<'_>) -> usize {
    date_tokens(&element_text(element)).len()
}

/// Widen each date fragment to the largest ancestor below the container that
/// still holds exactly one date. `None` unless every day gets a box with some
/// payload besides its date.
fn day_boxes<'a>(region: &Region<'a>) -> Option<Vec<ElementRef<'a>>> {
    let root = region.root;
    let mut boxes = Vec::new();

    for fragment in region.fragments() {
        if first_date(&fragment.text).is_none() {
            continue;
        }
        let mut day = fragment.parent;
        if day.id() == root.id() || date_count(day) != 1 {
            return None;
        }
        while let Some(parent) = parent_element(day) {
            if parent.id() == root.id() || date_count(parent) != 1 {
                break;
            }
            day = parent;
        }
        boxes.push(day);
    }

    let all_have_payload = boxes.iter().all(|day| has_payload(*day));
    (!boxes.is_empty() && all_have_payload).then_some(boxes)
}

fn has_payload(day: ElementRef<'_>) -> bool {
    let region = Region::whole(day);
    let text = region.flattened();
    !loose_integers(&text).is_empty()
        || !percent_tokens(&text).is_empty()
        || region
            .image_alts()
            .iter()
            .any(|(_, alt)| has_weather_char(alt))
}

fn first_weather_alt(region: &Region<'_>) -> Option<String> {
    region
        .image_alts()
        .into_iter()
        .map(|(_, alt)| alt)
        .find(|alt| has_weather_char(alt))
}

fn read_day_box(day: ElementRef<'_>) -> OutlookRecord {
    let region = Region::whole(day);
    let text = region.flattened();
    let temps = loose_integers(&text);
    OutlookRecord {
        date: first_date(&text).unwrap_or_default(),
        weather_text: first_weather_alt(&region).unwrap_or_default(),
        temp_max: temps.first().cloned().flatten(),
        temp_min: temps.get(1).cloned().flatten(),
        precip_prob: percent_tokens(&text).into_iter().next().unwrap_or_default(),
    }
}

fn read_global_streams(region: &Region<'_>) -> Vec<OutlookRecord> {
    let text = region.flattened();
    let dates = date_tokens(&text);
    let weathers: Vec<String> = region
        .image_alts()
        .into_iter()
        .map(|(_, alt)| alt)
        .filter(|alt| has_weather_char(alt))
        .collect();
    let temps = loose_integers(&text);
    let pops = percent_tokens(&text);

    if temps.len() != dates.len() * 2 || pops.len() != dates.len() {
        debug!(
            dates = dates.len(),
            temps = temps.len(),
            pops = pops.len(),
            "Outlook token streams are not aligned"
        );
    }

    dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| OutlookRecord {
            date,
            weather_text: weathers.get(i).cloned().unwrap_or_default(),
            temp_max: temps.get(2 * i).cloned().flatten(),
            temp_min: temps.get(2 * i + 1).cloned().flatten(),
            precip_prob: pops.get(i).cloned().unwrap_or_default(),
        })
        .collect()
}
