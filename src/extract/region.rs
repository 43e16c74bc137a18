//! Text-fragment navigation inside a located container.
//!
//! A [`Region`] is a container element plus the heading that anchors it. The
//! heading's own text is excluded from scanning so a title like `10日間天気`
//! does not leak numbers into the token streams.

use crate::utils::clean_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static IMG_WITH_ALT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[alt]").expect("img selector"));

/// A cleaned, non-empty text node and the element directly enclosing it.
#[derive(Debug, Clone)]
pub struct Fragment<'a> {
    pub text: String,
    pub parent: ElementRef<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    pub root: ElementRef<'a>,
    heading: Option<ElementRef<'a>>,
}

/// Cleaned text of an element, its text nodes joined by single spaces.
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

/// Parent element, if the parent node is an element.
pub fn parent_element<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.parent().and_then(ElementRef::wrap)
}

impl<'a> Region<'a> {
    /// A region rooted at `root` that skips the text under `heading`.
    ///
    /// When the heading is its own container nothing is skipped.
    pub fn new(root: ElementRef<'a>, heading: ElementRef<'a>) -> Self {
        let heading = (root.id() != heading.id()).then_some(heading);
        Self { root, heading }
    }

    /// A region covering all of `root`.
    pub fn whole(root: ElementRef<'a>) -> Self {
        Self { root, heading: None }
    }

    fn outside_heading(&self, element: ElementRef<'a>) -> bool {
        match self.heading {
            Some(h) => {
                element.id() != h.id() && !element.ancestors().any(|a| a.id() == h.id())
            }
            None => true,
        }
    }

    /// Every non-empty text fragment in document order.
    pub fn fragments(&self) -> Vec<Fragment<'a>> {
        self.root
            .descendants()
            .filter_map(|node| {
                let text = clean_text(node.value().as_text()?);
                if text.is_empty() {
                    return None;
                }
                let parent = node.parent().and_then(ElementRef::wrap)?;
                self.outside_heading(parent)
                    .then_some(Fragment { text, parent })
            })
            .collect()
    }

    /// All fragment text flattened into one cleaned string.
    pub fn flattened(&self) -> String {
        self.fragments()
            .into_iter()
            .map(|f| f.text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First fragment containing `marker`.
    pub fn find(&self, marker: &str) -> Option<Fragment<'a>> {
        self.fragments().into_iter().find(|f| f.text.contains(marker))
    }

    /// Text following `marker` in the smallest enclosing element that holds
    /// more than the bare marker, climbing no higher than the region root.
    ///
    /// A bare marker in a `dt`/`th` label cell reads only the value cell
    /// that follows it.
    ///
    /// `None` when no fragment contains the marker; `Some("")` when the marker
    /// is found but nothing follows it anywhere up to the root.
    pub fn text_after(&self, marker: &str) -> Option<String> {
        let fragment = self.find(marker)?;
        let mut element = fragment.parent;
        loop {
            let tail = tail_after(&element_text(element), marker);
            if !tail.is_empty() || element.id() == self.root.id() {
                return Some(tail);
            }
            if matches!(element.value().name(), "dt" | "th") {
                if let Some(value) = next_element(element) {
                    return Some(element_text(value));
                }
            }
            match parent_element(element) {
                Some(parent) => element = parent,
                None => return Some(tail),
            }
        }
    }

    /// The table row holding `marker`, or the marker's enclosing element when
    /// it is not inside a row.
    pub fn row_of(&self, marker: &str) -> Option<ElementRef<'a>> {
        let fragment = self.find(marker)?;
        let mut element = fragment.parent;
        loop {
            if element.value().name() == "tr" {
                return Some(element);
            }
            if element.id() == self.root.id() {
                break;
            }
            match parent_element(element) {
                Some(parent) => element = parent,
                None => break,
            }
        }
        Some(fragment.parent)
    }

    /// `alt` text of every image in document order, with its element.
    pub fn image_alts(&self) -> Vec<(ElementRef<'a>, String)> {
        self.root
            .select(&IMG_WITH_ALT)
            .filter(|img| self.outside_heading(*img))
            .filter_map(|img| {
                let alt = clean_text(img.value().attr("alt")?);
                Some((img, alt))
            })
            .collect()
    }
}

fn next_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

fn tail_after(text: &str, marker: &str) -> String {
    text.split_once(marker)
        .map(|(_, rest)| {
            rest.trim_start_matches([' ', ':', '：'])
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}
