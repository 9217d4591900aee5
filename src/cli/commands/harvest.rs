//! Harvest command.

use console::style;

use crate::cli::progress::HarvestProgress;
use crate::config::HarvestConfig;
use crate::harvest::{Harvester, HttpClient};
use crate::output;
use crate::sink::{ConsoleSink, CsvLogSink, RecordSink, TeeSink};

/// Run the paginated list harvester and write the output CSV.
pub async fn cmd_harvest(config: HarvestConfig, no_progress: bool) -> anyhow::Result<()> {
    config.validate()?;
    std::fs::create_dir_all(&config.output_dir)?;

    let mut sinks: Vec<Box<dyn RecordSink>> =
        vec![Box::new(CsvLogSink::new(config.run_log_path()))];
    if no_progress {
        sinks.push(Box::new(ConsoleSink));
    } else {
        sinks.push(Box::new(HarvestProgress::new(config.max_items as u64)));
    }
    let sink = TeeSink::new(sinks);

    let client = HttpClient::new(config.request_timeout(), config.user_agent.as_deref())?;
    let harvester = Harvester::new(&config, client, &sink);
    let films = harvester.run().await?;

    let path = config.output_path();
    output::write_films(&path, &films)?;
    drop(sink);

    println!(
        "{} Wrote {} films to {}",
        style("✓").green(),
        films.len(),
        path.display()
    );
    Ok(())
}
