//! cineharvest - film list harvesting and pipeline automation.
//!
//! A tool for scraping film metadata from paginated catalog lists and
//! driving the downstream update, build, and packaging pipeline.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cineharvest::cli::is_verbose() {
        "cineharvest=info"
    } else {
        "cineharvest=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cineharvest::cli::run().await
}
