//! Sequential pipeline orchestration.
//!
//! The pipeline is a finite state machine over four phases. Each phase runs
//! its steps one at a time, streaming child output through the run-log sink;
//! the first failing step halts the whole pipeline in a `Failed` terminal
//! state and nothing later runs. No retry, no parallelism, no child timeout.

mod package;
mod runner;

pub use package::package_artifacts;
pub use runner::{check_available, format_duration, run_step, StepOutcome};

use std::time::Instant;

use chrono::Local;

use crate::config::{PipelineConfig, StepConfig};
use crate::sink::RecordSink;

/// Pipeline phases in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scrape,
    Process,
    Build,
    Package,
}

impl Phase {
    /// The phase after this one, None for the last.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Scrape => Some(Phase::Process),
            Phase::Process => Some(Phase::Build),
            Phase::Build => Some(Phase::Package),
            Phase::Package => None,
        }
    }

    /// 1-based position for banners.
    pub fn number(self) -> usize {
        match self {
            Phase::Scrape => 1,
            Phase::Process => 2,
            Phase::Build => 3,
            Phase::Package => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::Scrape => "DATA SCRAPING",
            Phase::Process => "DATA PROCESSING & UPDATES",
            Phase::Build => "BUILD",
            Phase::Package => "PACKAGING",
        }
    }
}

/// Orchestrator state. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Running(Phase),
    Completed,
    Failed(Phase),
}

impl PipelineState {
    /// Transition on the outcome of the phase just run. Success moves to
    /// the next phase (or `Completed` after the last); failure is terminal.
    pub fn advance(self, success: bool) -> PipelineState {
        match self {
            PipelineState::Running(phase) => {
                if !success {
                    PipelineState::Failed(phase)
                } else {
                    match phase.next() {
                        Some(next) => PipelineState::Running(next),
                        None => PipelineState::Completed,
                    }
                }
            }
            terminal => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineState::Running(_))
    }
}

/// Runs the configured phases to a terminal state.
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    sink: &'a dyn RecordSink,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PipelineConfig, sink: &'a dyn RecordSink) -> Self {
        Self { config, sink }
    }

    /// Run every phase in order, halting on the first failure. Returns the
    /// terminal state.
    pub async fn run(&self) -> PipelineState {
        let start = Instant::now();
        let date = Local::now().format("%B %d, %Y");
        self.banner(&format!("Starting Full Pipeline - {}", date));

        let mut state = PipelineState::Running(Phase::Scrape);
        while let PipelineState::Running(phase) = state {
            self.banner(&format!("PHASE {}: {}", phase.number(), phase.title()));
            let success = self.run_phase(phase).await;
            state = state.advance(success);
        }

        match state {
            PipelineState::Completed => {
                self.banner("PIPELINE FINISHED");
                self.sink.record(&format!(
                    "Total execution time: {}",
                    format_duration(start.elapsed())
                ));
            }
            PipelineState::Failed(phase) => {
                self.sink.record(&format!(
                    "Pipeline halted in phase {}: {}",
                    phase.number(),
                    phase.title()
                ));
            }
            PipelineState::Running(_) => unreachable!("loop exits on terminal states"),
        }

        state
    }

    async fn run_phase(&self, phase: Phase) -> bool {
        match phase {
            Phase::Scrape => {
                self.run_steps(&self.config.scrape, "Scraping Progress").await
            }
            Phase::Process => {
                self.run_steps(&self.config.process, "Processing Progress")
                    .await
            }
            Phase::Build => self.run_build().await,
            Phase::Package => self.run_package(),
        }
    }

    async fn run_steps(&self, steps: &[StepConfig], label: &str) -> bool {
        let total = steps.len();
        for (i, step) in steps.iter().enumerate() {
            self.sink
                .record(&format!("{}: {}/{} steps", label, i + 1, total));
            let outcome = run_step(step, self.sink).await;
            if !outcome.success {
                self.sink.record(&format!(
                    "Stopping execution due to error in {}",
                    step.description
                ));
                return false;
            }
        }
        true
    }

    async fn run_build(&self) -> bool {
        let build = match &self.config.build {
            Some(b) => b,
            None => {
                self.sink.record("No build step configured, skipping");
                return true;
            }
        };

        if !check_available(&build.step.command, &build.check_args).await {
            self.sink.record(&format!(
                "{} is not installed or not in PATH",
                build.step.command
            ));
            return false;
        }

        let outcome = run_step(&build.step, self.sink).await;
        if !outcome.success {
            self.sink.record(&format!(
                "Stopping execution due to error in {}",
                build.step.description
            ));
        }
        outcome.success
    }

    fn run_package(&self) -> bool {
        let package = match &self.config.package {
            Some(p) => p,
            None => {
                self.sink.record("No package step configured, skipping");
                return true;
            }
        };

        let start = Instant::now();
        self.sink
            .record(&format!("{:=^100}", " Creating Package Folder "));
        match package_artifacts(package, self.sink) {
            Ok(folder) => {
                self.sink.record(&format!(
                    "[+] Package folder created successfully: {}",
                    folder.display()
                ));
                self.sink.record(&format!(
                    "Execution time: {}",
                    format_duration(start.elapsed())
                ));
                true
            }
            Err(e) => {
                self.sink
                    .record(&format!("[-] Error creating package folder: {}", e));
                false
            }
        }
    }

    fn banner(&self, title: &str) {
        self.sink.record(&"=".repeat(100));
        self.sink.record(&format!("{:^100}", title));
        self.sink.record(&"=".repeat(100));
    }
}
