//! Run-log sinks.
//!
//! The harvester and orchestrator report everything user-visible through an
//! injected [`RecordSink`] rather than printing directly. Frontends compose
//! the sinks they want: console output, a mirrored CSV run log, a progress
//! bar, or an in-memory buffer in tests.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

/// Capability to record one human-readable run-log message.
pub trait RecordSink: Send + Sync {
    /// Record a free-form status line.
    fn record(&self, message: &str);

    /// Called after each admission with the running count and the cap.
    fn admitted(&self, _count: usize, _max: usize) {}
}

impl<T: RecordSink + ?Sized> RecordSink for std::sync::Arc<T> {
    fn record(&self, message: &str) {
        (**self).record(message);
    }

    fn admitted(&self, count: usize, max: usize) {
        (**self).admitted(count, max);
    }
}

/// Prints each message to stdout.
pub struct ConsoleSink;

impl RecordSink for ConsoleSink {
    fn record(&self, message: &str) {
        println!("{}", message);
    }
}

/// Appends each message as a single-column CSV row.
///
/// The file is opened per record so a crashed run still keeps everything
/// written so far.
pub struct CsvLogSink {
    path: PathBuf,
}

impl CsvLogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record([message])?;
        writer.flush()?;
        Ok(())
    }
}

impl RecordSink for CsvLogSink {
    fn record(&self, message: &str) {
        if let Err(e) = self.append(message) {
            warn!("Failed to append run log {}: {}", self.path.display(), e);
        }
    }
}

/// Fans each message out to every inner sink.
pub struct TeeSink {
    sinks: Vec<Box<dyn RecordSink>>,
}

impl TeeSink {
    pub fn new(sinks: Vec<Box<dyn RecordSink>>) -> Self {
        Self { sinks }
    }
}

impl RecordSink for TeeSink {
    fn record(&self, message: &str) {
        for sink in &self.sinks {
            sink.record(message);
        }
    }

    fn admitted(&self, count: usize, max: usize) {
        for sink in &self.sinks {
            sink.admitted(count, max);
        }
    }
}

/// Collects messages in memory. Used by tests to assert on the run log.
#[derive(Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl RecordSink for MemorySink {
    fn record(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// A no-op sink.
pub struct NullSink;

impl RecordSink for NullSink {
    fn record(&self, _message: &str) {}
}
