//! Suspicious activity detection
//!
//! Rules are checked in priority order and the first one that applies
//! decides the outcome, so a record yields at most one alert:
//!
//! 1. 401/403 responses feed a per-address sliding window. When the window
//!    holds `failure_threshold` failures a brute-force alert fires and the
//!    address's history is cleared, so a new burst must build up from zero.
//!    Failure responses are handled by this rule alone.
//! 2. Paths containing a watch-list fragment (case-insensitive).
//! 3. 404 responses, as possible endpoint probing.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};

use super::FailureWindow;
use crate::config::{DetectionConfig, MAX_WINDOW_MINUTES};
use crate::models::{Alert, AlertKind, LogRecord};

/// Stateful detector; records must be fed in arrival order
///
/// State is keyed by source address and owned by the instance, so separate
/// detectors over disjoint address sets never interact.
pub struct ActivityDetector {
    /// Maps source address -> recent authentication failures
    failures: HashMap<String, FailureWindow>,
    failure_threshold: usize,
    window_minutes: i64,
    /// Lowercased watch-list fragments
    sensitive_paths: Vec<String>,
}

impl ActivityDetector {
    /// Create a detector with default thresholds
    pub fn new() -> Self {
        Self::with_config(&DetectionConfig::default())
    }

    /// Create a detector from detection settings
    ///
    /// Out-of-range values are clamped: the threshold to at least 1 and the
    /// window to `1..=MAX_WINDOW_MINUTES`.
    pub fn with_config(config: &DetectionConfig) -> Self {
        ActivityDetector {
            failures: HashMap::new(),
            failure_threshold: config.failure_threshold.max(1),
            window_minutes: config.window_minutes.clamp(1, MAX_WINDOW_MINUTES),
            sensitive_paths: config
                .sensitive_paths
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// Check one record, returning the alert it triggers if any
    pub fn detect(&mut self, record: &LogRecord) -> Option<Alert> {
        if record.is_auth_failure() {
            return self.check_brute_force(record);
        }

        if let Some(alert) = self.check_sensitive_path(record) {
            return Some(alert);
        }

        if record.is_not_found() {
            return Some(Alert {
                kind: AlertKind::NotFoundProbe,
                message: format!(
                    "404 Not Found from {} for {}, could be probing",
                    record.ip, record.path
                ),
                record: record.clone(),
            });
        }

        None
    }

    fn check_brute_force(&mut self, record: &LogRecord) -> Option<Alert> {
        let window = self.window();
        let entry = self
            .failures
            .entry(record.ip.clone())
            .or_insert_with(FailureWindow::new);
        entry.add_and_prune(record.datetime, window);

        let count = entry.count();
        if count < self.failure_threshold {
            log::trace!("{} has {} failure(s) in window", record.ip, count);
            return None;
        }

        self.failures.remove(&record.ip);

        Some(Alert {
            kind: AlertKind::BruteForce,
            message: format!(
                "Possible brute force attack from {} ({} failed attempts within {} minute(s))",
                record.ip, count, self.window_minutes
            ),
            record: record.clone(),
        })
    }

    fn check_sensitive_path(&self, record: &LogRecord) -> Option<Alert> {
        let path = record.path.to_lowercase();
        if !self.sensitive_paths.iter().any(|s| path.contains(s.as_str())) {
            return None;
        }

        Some(Alert {
            kind: AlertKind::SensitivePath,
            message: format!(
                "Suspicious path access: {} tried to access {}",
                record.ip, record.path
            ),
            record: record.clone(),
        })
    }

    fn window(&self) -> Duration {
        Duration::minutes(self.window_minutes)
    }

    /// Failures currently counted for an address
    pub fn failure_count(&self, ip: &str) -> usize {
        self.failures.get(ip).map(|w| w.count()).unwrap_or(0)
    }

    /// Number of addresses with failures in their window
    pub fn tracked_sources(&self) -> usize {
        self.failures.len()
    }

    /// Drop failures that have fallen out of the window as of `now`
    pub fn prune_stale(&mut self, now: NaiveDateTime) {
        let cutoff = now - self.window();
        self.failures.retain(|_, window| {
            window.prune(cutoff);
            !window.is_empty()
        });
    }

    /// Forget all per-address state
    pub fn clear(&mut self) {
        self.failures.clear();
    }
}

impl Default for ActivityDetector {
    fn default() -> Self {
        Self::new()
    }
}
