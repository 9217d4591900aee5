//! Data models for cineharvest.

mod film;

pub use film::{split_display_name, CatalogItem};
