//! Film models for catalog list harvesting.
//!
//! A harvested film is identified by its `(title, year)` pair for
//! deduplication and by a source-specific ID for downstream consumers.

use serde::{Deserialize, Serialize};

/// One accepted entry from a source list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Display name exactly as the listing page presents it,
    /// possibly with a trailing `(year)` suffix.
    pub raw_display_name: String,
    /// Title with any trailing `(year)` suffix removed.
    pub title: String,
    /// Release year, empty when the raw name carries none.
    pub year: String,
    /// Source-specific film identifier.
    pub external_id: String,
    /// Relative path to the film's detail page.
    pub detail_url: String,
    /// Rating count read from the detail page (0 when unreadable).
    pub popularity_count: u64,
    /// 1-based position at which the item was accepted.
    pub admission_order: usize,
}

impl CatalogItem {
    /// Build an item from listing-page fields. Popularity and admission
    /// order are filled in later by the harvester.
    pub fn from_listing(raw_display_name: &str, external_id: &str, detail_url: &str) -> Self {
        let (title, year) = split_display_name(raw_display_name);
        Self {
            raw_display_name: raw_display_name.to_string(),
            title,
            year,
            external_id: external_id.to_string(),
            detail_url: detail_url.to_string(),
            popularity_count: 0,
            admission_order: 0,
        }
    }

    /// Composite key used by the admission filter.
    pub fn dedup_key(&self) -> String {
        format!("{}_{}", self.title, self.year)
    }
}

/// Split a raw display name into title and year using the last
/// parenthesis pair. Names without a pair keep the full string as the
/// title and an empty year.
pub fn split_display_name(raw: &str) -> (String, String) {
    if let (Some(open), Some(close)) = (raw.rfind('('), raw.rfind(')')) {
        if open < close {
            let year = raw[open + 1..close].to_string();
            let title = raw[..open].trim().to_string();
            return (title, year);
        }
    }
    (raw.trim().to_string(), String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_year() {
        assert_eq!(
            split_display_name("Title (1999)"),
            ("Title".to_string(), "1999".to_string())
        );
    }

    #[test]
    fn test_split_without_year() {
        assert_eq!(
            split_display_name("Title With No Year"),
            ("Title With No Year".to_string(), String::new())
        );
    }

    #[test]
    fn test_split_uses_last_pair() {
        assert_eq!(
            split_display_name("Crocodile (Akumulator) (1994)"),
            ("Crocodile (Akumulator)".to_string(), "1994".to_string())
        );
    }

    #[test]
    fn test_split_unbalanced_parens() {
        // A close before an open is not a pair.
        assert_eq!(
            split_display_name("Who) Am (I"),
            ("Who) Am (I".to_string(), String::new())
        );
    }

    #[test]
    fn test_dedup_key() {
        let item = CatalogItem::from_listing("Sleep (2023)", "901", "/film/sleep-2023/");
        assert_eq!(item.title, "Sleep");
        assert_eq!(item.year, "2023");
        assert_eq!(item.dedup_key(), "Sleep_2023");
    }

    #[test]
    fn test_dedup_key_empty_year() {
        let item = CatalogItem::from_listing("Untitled Project", "77", "/film/untitled/");
        assert_eq!(item.dedup_key(), "Untitled Project_");
    }
}
