use chrono::{Duration, NaiveDateTime};

/// Authentication failure timestamps for one source address
#[derive(Debug, Clone, Default)]
pub struct FailureWindow {
    timestamps: Vec<NaiveDateTime>,
}

impl FailureWindow {
    pub fn new() -> Self {
        FailureWindow { timestamps: Vec::new() }
    }

    /// Record a failure and drop the ones older than `window` before it
    ///
    /// A failure exactly `window` old still counts.
    pub fn add_and_prune(&mut self, timestamp: NaiveDateTime, window: Duration) {
        self.timestamps.push(timestamp);
        self.prune(timestamp - window);
    }

    /// Drop failures strictly before `cutoff`
    pub fn prune(&mut self, cutoff: NaiveDateTime) {
        self.timestamps.retain(|&t| t >= cutoff);
    }

    pub fn count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
