//! Listing-page parsing.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::extract::extract_fields;
use crate::models::CatalogItem;
use crate::sink::RecordSink;

/// Parsed contents of one listing page.
pub struct ListingPage {
    /// Items with all required attributes, in page order. Popularity and
    /// admission order are not filled in yet.
    pub items: Vec<CatalogItem>,
    /// Whether the page carries a pagination "next" control.
    pub has_next: bool,
}

impl ListingPage {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_next: false,
        }
    }
}

/// Extract the film list and next-page flag from listing markup.
///
/// Structural problems (no list container, no item elements) are recorded as
/// warnings and yield an empty page with no next-page flag; the caller treats
/// that as "stop paginating". Items missing required attributes are recorded
/// and skipped without affecting the rest of the page.
pub fn parse_listing(html: &str, sink: &dyn RecordSink) -> ListingPage {
    let document = Html::parse_document(html);

    let container = match find_container(&document) {
        Some(c) => c,
        None => {
            sink.record("Warning: Could not find poster list container");
            return ListingPage::empty();
        }
    };

    let item_selector = match Selector::parse("li.posteritem") {
        Ok(s) => s,
        Err(_) => return ListingPage::empty(),
    };
    let elements: Vec<ElementRef> = container.select(&item_selector).collect();
    if elements.is_empty() {
        sink.record("Warning: Could not find film item elements");
        return ListingPage::empty();
    }

    sink.record(&format!(
        "Found {} film elements on this page",
        elements.len()
    ));

    let mut items = Vec::new();
    for (i, element) in elements.iter().enumerate() {
        match extract_fields(element) {
            Some(fields) => items.push(CatalogItem::from_listing(
                &fields.display_name,
                &fields.external_id,
                &fields.detail_url,
            )),
            None => {
                sink.record(&format!("Warning: Missing data for film element {}", i + 1));
                debug!(
                    "film element {} attributes: {:?}",
                    i + 1,
                    element.value().attrs().collect::<Vec<_>>()
                );
            }
        }
    }

    ListingPage {
        items,
        has_next: has_next_control(&document),
    }
}

/// The item-listing container: the poster list when present, otherwise the
/// first list element on the page.
fn find_container(document: &Html) -> Option<ElementRef<'_>> {
    for selector_str in ["ul.poster-list", "ul"] {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                return Some(element);
            }
        }
    }
    None
}

fn has_next_control(document: &Html) -> bool {
    match Selector::parse("a.next") {
        Ok(selector) => document.select(&selector).next().is_some(),
        Err(_) => false,
    }
}
