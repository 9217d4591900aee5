//! Full-pipeline command.

use crate::config::Settings;
use crate::pipeline::{Pipeline, PipelineState};
use crate::sink::{ConsoleSink, CsvLogSink, RecordSink, TeeSink};

/// Run the scrape → process → build → package pipeline from configuration.
pub async fn cmd_run_all(settings: &Settings) -> anyhow::Result<()> {
    std::fs::create_dir_all(&settings.harvest.output_dir)?;

    let sink = TeeSink::new(vec![
        Box::new(ConsoleSink) as Box<dyn RecordSink>,
        Box::new(CsvLogSink::new(settings.harvest.run_log_path())),
    ]);

    let pipeline = Pipeline::new(&settings.pipeline, &sink);
    match pipeline.run().await {
        PipelineState::Completed => Ok(()),
        PipelineState::Failed(phase) => {
            anyhow::bail!("pipeline failed in phase {}: {}", phase.number(), phase.title())
        }
        PipelineState::Running(_) => unreachable!("pipeline returns terminal states"),
    }
}
