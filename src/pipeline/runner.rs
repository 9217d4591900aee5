//! External command execution with streamed output.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::config::StepConfig;
use crate::sink::RecordSink;

/// Result of one external command invocation.
#[derive(Debug, Clone, Copy)]
pub struct StepOutcome {
    pub success: bool,
    pub duration: Duration,
}

/// Run one step, streaming its stdout and stderr line by line to the sink
/// and recording wall-clock duration. A spawn failure or nonzero exit status
/// yields `success = false`; the child is never timed out.
pub async fn run_step(step: &StepConfig, sink: &dyn RecordSink) -> StepOutcome {
    sink.record(&format!(
        "{:=^100}",
        format!(" Running {} ", step.description)
    ));
    let start = Instant::now();

    let mut child = match Command::new(&step.command)
        .args(&step.args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            sink.record(&format!("Error running {}: {}", step.description, e));
            return StepOutcome {
                success: false,
                duration: start.elapsed(),
            };
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    tokio::join!(stream_lines(stdout, sink), stream_lines(stderr, sink));

    let status = child.wait().await;
    let duration = start.elapsed();

    let success = match status {
        Ok(status) if status.success() => {
            sink.record(&format!("[+] {} completed successfully", step.description));
            true
        }
        Ok(status) => {
            sink.record(&format!(
                "[-] {} failed with return code {}",
                step.description,
                status.code().map_or_else(|| "?".to_string(), |c| c.to_string())
            ));
            false
        }
        Err(e) => {
            sink.record(&format!("Error running {}: {}", step.description, e));
            false
        }
    };

    sink.record(&format!("Execution time: {}", format_duration(duration)));

    StepOutcome { success, duration }
}

async fn stream_lines<R: AsyncRead + Unpin>(reader: Option<R>, sink: &dyn RecordSink) {
    let Some(reader) = reader else { return };
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        sink.record(&line);
    }
}

/// Preflight check that a tool responds, e.g. `node --version`.
pub async fn check_available(command: &str, check_args: &[String]) -> bool {
    let status = Command::new(command)
        .args(check_args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) => status.success(),
        Err(e) => {
            debug!("availability check for {} failed: {}", command, e);
            false
        }
    }
}

/// Humanized wall-clock duration: `2h 3m 4s`, `3m 4s`, or `4s`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
