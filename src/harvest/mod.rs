//! Paginated list harvester.
//!
//! Walks a listing URL page by page, pulls per-film metadata out of the
//! markup, checks each film's rating count against a threshold on its detail
//! page, and collects accepted films in admission order. Strictly sequential:
//! one request in flight at a time, with a flat delay between pages.

mod client;
mod detail;
mod extract;
mod listing;

pub use client::{HttpClient, USER_AGENT};
pub use detail::parse_rating_count;
pub use extract::{extract_fields, AttrStrategy, ItemFields, REQUIRED_ATTRS};
pub use listing::{parse_listing, ListingPage};

use std::collections::HashSet;

use async_trait::async_trait;
use url::Url;

use crate::config::{ConfigError, HarvestConfig};
use crate::models::CatalogItem;
use crate::sink::RecordSink;

/// Errors surfaced by the harvester and its output writer.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Text-fetching seam between the harvester and the network.
///
/// Production uses [`HttpClient`]; tests inject mock sites.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String, HarvestError>;
}

#[async_trait]
impl<'a, T: Fetch + ?Sized> Fetch for &'a T {
    async fn get_text(&self, url: &str) -> Result<String, HarvestError> {
        (**self).get_text(url).await
    }
}

/// Listing URL for page `n`, following the `page/{n}/` path convention.
pub fn page_url(base: &str, page: u32) -> String {
    if base.ends_with('/') {
        format!("{}page/{}/", base, page)
    } else {
        format!("{}/page/{}/", base, page)
    }
}

/// Resolve a relative detail path against the listing URL's origin.
pub fn resolve_detail_url(base: &str, detail_path: &str) -> Result<String, url::ParseError> {
    let base = Url::parse(base)?;
    Ok(base.join(detail_path)?.to_string())
}

/// Outcome of one listing-page pass.
struct PageResult {
    has_next: bool,
}

/// Drives the fetch/parse/admit loop for one list.
pub struct Harvester<'a, F: Fetch> {
    config: &'a HarvestConfig,
    fetcher: F,
    sink: &'a dyn RecordSink,
    admitted_keys: HashSet<String>,
    accepted: Vec<CatalogItem>,
}

impl<'a, F: Fetch> Harvester<'a, F> {
    pub fn new(config: &'a HarvestConfig, fetcher: F, sink: &'a dyn RecordSink) -> Self {
        Self {
            config,
            fetcher,
            sink,
            admitted_keys: HashSet::new(),
            accepted: Vec::new(),
        }
    }

    /// Run to termination: either `max_items` films are admitted or a page
    /// reports no next-page control. Returns the accepted films in
    /// admission order.
    pub async fn run(mut self) -> Result<Vec<CatalogItem>, HarvestError> {
        self.config.validate()?;

        let mut page = 1u32;
        loop {
            if self.accepted.len() >= self.config.max_items {
                break;
            }

            let url = page_url(&self.config.base_list_url, page);
            self.sink.record(&format!("=== Page {} ===", page));
            self.sink.record(&format!(
                "Progress: {}/{} films collected",
                self.accepted.len(),
                self.config.max_items
            ));

            let result = self.process_page(&url).await;

            if self.accepted.len() >= self.config.max_items || !result.has_next {
                break;
            }

            page += 1;
            tokio::time::sleep(self.config.page_delay()).await;
        }

        self.sink
            .record(&format!("Scraped {} films", self.accepted.len()));
        Ok(self.accepted)
    }

    /// Fetch and work through one listing page.
    ///
    /// A fetch or parse failure is recorded and treated as an empty page
    /// with no next-page control, which ends pagination. There is no retry.
    async fn process_page(&mut self, url: &str) -> PageResult {
        if self.accepted.len() >= self.config.max_items {
            return PageResult { has_next: false };
        }

        let html = match self.fetcher.get_text(url).await {
            Ok(html) => html,
            Err(e) => {
                self.sink.record(&format!("Error processing page: {}", e));
                return PageResult { has_next: false };
            }
        };

        let listing = parse_listing(&html, self.sink);

        for item in listing.items {
            if self.accepted.len() >= self.config.max_items {
                self.sink.record(&format!(
                    "Reached maximum number of films ({}). Stopping...",
                    self.config.max_items
                ));
                return PageResult { has_next: false };
            }

            self.consider(item).await;
        }

        PageResult {
            has_next: listing.has_next,
        }
    }

    /// Apply the admission filter to one listed film, fetching its detail
    /// page for the rating count. Per-item failures are soft: recorded and
    /// skipped, never aborting the page.
    async fn consider(&mut self, mut item: CatalogItem) {
        let key = item.dedup_key();
        if self.admitted_keys.contains(&key) {
            self.sink.record(&format!(
                "✗ {} - Not added (Duplicate film)",
                item.raw_display_name
            ));
            return;
        }

        let detail_url = match resolve_detail_url(&self.config.base_list_url, &item.detail_url) {
            Ok(u) => u,
            Err(e) => {
                self.sink.record(&format!(
                    "✗ {} - Error checking rating count: {}",
                    item.raw_display_name, e
                ));
                return;
            }
        };

        let detail_html = match self.fetcher.get_text(&detail_url).await {
            Ok(html) => html,
            Err(e) => {
                self.sink.record(&format!(
                    "✗ {} - Error checking rating count: {}",
                    item.raw_display_name, e
                ));
                return;
            }
        };

        let rating_count = parse_rating_count(&detail_html);
        if rating_count < self.config.min_popularity_count {
            self.sink.record(&format!(
                "✗ {} - Not added (Rating count: {} < {})",
                item.raw_display_name, rating_count, self.config.min_popularity_count
            ));
            return;
        }

        item.popularity_count = rating_count;
        item.admission_order = self.accepted.len() + 1;
        self.admitted_keys.insert(key);
        self.sink.record(&format!("✓ {}", item.raw_display_name));
        self.accepted.push(item);
        self.sink
            .admitted(self.accepted.len(), self.config.max_items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_with_trailing_slash() {
        assert_eq!(
            page_url("https://example.com/list/", 3),
            "https://example.com/list/page/3/"
        );
    }

    #[test]
    fn test_page_url_without_trailing_slash() {
        assert_eq!(
            page_url("https://example.com/list", 1),
            "https://example.com/list/page/1/"
        );
    }

    #[test]
    fn test_resolve_detail_url_against_origin() {
        let resolved =
            resolve_detail_url("https://example.com/list/by/rating/", "/film/sleep-2023/")
                .unwrap();
        assert_eq!(resolved, "https://example.com/film/sleep-2023/");
    }
}
