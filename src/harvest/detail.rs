//! Detail-page popularity extraction.
//!
//! Detail pages embed structured metadata as JSON-LD, sometimes wrapped in
//! CDATA comment markers. The rating count lives at
//! `aggregateRating.ratingCount`. Anything unreadable yields 0 rather than an
//! error, so a malformed page can only affect the threshold decision.

use scraper::{Html, Selector};

const CDATA_OPEN: &str = "/* <![CDATA[ */";
const CDATA_CLOSE: &str = "/* ]]> */";

/// Read the rating count from a detail page's JSON-LD block.
pub fn parse_rating_count(html: &str) -> u64 {
    let document = Html::parse_document(html);
    let selector = match Selector::parse(r#"script[type="application/ld+json"]"#) {
        Ok(s) => s,
        Err(_) => return 0,
    };
    let script = match document.select(&selector).next() {
        Some(s) => s,
        None => return 0,
    };
    let text: String = script.text().collect();
    rating_count_from_json(&text)
}

fn rating_count_from_json(raw: &str) -> u64 {
    let cleaned = raw.trim().replace(CDATA_OPEN, "").replace(CDATA_CLOSE, "");
    let value: serde_json::Value = match serde_json::from_str(cleaned.trim()) {
        Ok(v) => v,
        Err(_) => return 0,
    };
    let count = &value["aggregateRating"]["ratingCount"];
    count
        .as_u64()
        .or_else(|| count.as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0)
}
