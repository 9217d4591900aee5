//! cineharvest - film list harvesting and pipeline automation.
//!
//! Harvests film metadata from paginated catalog list pages, filters by
//! rating count, writes ordered CSV output, and orchestrates the downstream
//! processing/build/package pipeline.

pub mod cli;
pub mod config;
pub mod harvest;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod sink;
