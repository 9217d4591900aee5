//! Progress display for the harvest command.

use indicatif::{ProgressBar, ProgressStyle};

use crate::sink::RecordSink;

/// Admission progress bar that also relays run-log lines, keeping the bar
/// pinned below the streamed messages.
pub struct HarvestProgress {
    bar: ProgressBar,
}

impl HarvestProgress {
    pub fn new(max_items: u64) -> Self {
        let bar = ProgressBar::new(max_items);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} films")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Self { bar }
    }
}

impl RecordSink for HarvestProgress {
    fn record(&self, message: &str) {
        self.bar.println(message);
    }

    fn admitted(&self, count: usize, _max: usize) {
        self.bar.set_position(count as u64);
    }
}

impl Drop for HarvestProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
