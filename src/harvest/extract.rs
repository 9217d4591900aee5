//! Per-item attribute extraction from listing markup.
//!
//! Listing sites have moved identifying attributes between the item element
//! and a nested component element across redesigns. Extraction is an ordered
//! list of strategies tried in sequence, merging field-wise, so the primary
//! source wins and the fallback only fills gaps.

use scraper::{ElementRef, Selector};

/// Attribute names required for every item.
pub const REQUIRED_ATTRS: [&str; 3] = [
    "data-item-link",
    "data-item-full-display-name",
    "data-film-id",
];

/// One place identifying attributes may live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrStrategy {
    /// Attributes on the item element itself.
    ItemElement,
    /// Attributes on a nested component element inside the item.
    NestedComponent,
}

const NESTED_COMPONENT_SELECTOR: &str = "div.react-component";

/// Strategies in fallback order.
pub const STRATEGIES: [AttrStrategy; 2] = [AttrStrategy::ItemElement, AttrStrategy::NestedComponent];

/// The identifying fields of one listed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub detail_url: String,
    pub display_name: String,
    pub external_id: String,
}

impl AttrStrategy {
    /// Read `(url, display name, id)` from this strategy's source element,
    /// each None when the attribute is absent.
    fn read(
        &self,
        element: &ElementRef,
    ) -> (Option<String>, Option<String>, Option<String>) {
        let source = match self {
            AttrStrategy::ItemElement => Some(*element),
            AttrStrategy::NestedComponent => match Selector::parse(NESTED_COMPONENT_SELECTOR) {
                Ok(selector) => element.select(&selector).next(),
                Err(_) => None,
            },
        };

        match source {
            Some(el) => {
                let attr = |name: &str| el.value().attr(name).map(|v| v.to_string());
                (
                    attr(REQUIRED_ATTRS[0]),
                    attr(REQUIRED_ATTRS[1]),
                    attr(REQUIRED_ATTRS[2]),
                )
            }
            None => (None, None, None),
        }
    }
}

/// Try each strategy in order until all required fields are present.
/// Returns None when even the full chain leaves a field missing.
pub fn extract_fields(element: &ElementRef) -> Option<ItemFields> {
    let mut detail_url: Option<String> = None;
    let mut display_name: Option<String> = None;
    let mut external_id: Option<String> = None;

    for strategy in STRATEGIES {
        let (url, name, id) = strategy.read(element);
        detail_url = detail_url.or(url);
        display_name = display_name.or(name);
        external_id = external_id.or(id);

        if detail_url.is_some() && display_name.is_some() && external_id.is_some() {
            break;
        }
    }

    Some(ItemFields {
        detail_url: detail_url?,
        display_name: display_name?,
        external_id: external_id?,
    })
}
