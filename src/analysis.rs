//! Single-pass analysis driver
//!
//! Feeds lines through the parser and, in input order, through the
//! detector. Reordering records would change which alerts fire.

use crate::detection::ActivityDetector;
use crate::models::{Alert, LogRecord};
use crate::parser::LineParser;

/// Everything one run produced
#[derive(Debug, Clone, Default)]
pub struct AnalysisSummary {
    /// Parsed records in input order
    pub records: Vec<LogRecord>,
    /// Alerts in detection order
    pub alerts: Vec<Alert>,
    /// Lines offered to the parser
    pub lines_read: usize,
    /// Lines that did not match the grammar
    pub rejected_lines: usize,
}

impl AnalysisSummary {
    pub fn total_entries(&self) -> usize {
        self.records.len()
    }

    pub fn alert_messages(&self) -> Vec<&str> {
        self.alerts.iter().map(|a| a.message.as_str()).collect()
    }
}

/// Couples a parser with a detector and accumulates their output
pub struct Analyzer {
    parser: LineParser,
    detector: ActivityDetector,
    summary: AnalysisSummary,
}

impl Analyzer {
    pub fn new(parser: LineParser, detector: ActivityDetector) -> Self {
        Analyzer {
            parser,
            detector,
            summary: AnalysisSummary::default(),
        }
    }

    /// Process one raw line, returning the alert it raised if any
    pub fn process_line(&mut self, line: &str) -> Option<&Alert> {
        self.summary.lines_read += 1;

        let record = match self.parser.parse(line) {
            Some(record) => record,
            None => {
                self.summary.rejected_lines += 1;
                log::debug!("Skipping unparsable line {}", self.summary.lines_read);
                return None;
            }
        };

        let alert = self.detector.detect(&record);
        self.summary.records.push(record);

        match alert {
            Some(alert) => {
                log::debug!("ALERT [{}] {}", alert.kind.rule_name(), alert.message);
                self.summary.alerts.push(alert);
                self.summary.alerts.last()
            }
            None => None,
        }
    }

    /// Process lines in order and return the accumulated summary
    pub fn run<I, S>(mut self, lines: I) -> AnalysisSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.process_line(line.as_ref());
        }
        self.finish()
    }

    pub fn detector(&self) -> &ActivityDetector {
        &self.detector
    }

    pub fn summary(&self) -> &AnalysisSummary {
        &self.summary
    }

    pub fn finish(self) -> AnalysisSummary {
        log::info!(
            "Analysed {} line(s): {} record(s), {} rejected, {} alert(s)",
            self.summary.lines_read,
            self.summary.records.len(),
            self.summary.rejected_lines,
            self.summary.alerts.len()
        );
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertKind;
    use std::sync::Mutex;

    struct CapturingLogger {
        entries: Mutex<Vec<(log::Level, String)>>,
    }

    impl log::Log for CapturingLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut entries) = self.entries.lock() {
                entries.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger {
        entries: Mutex::new(Vec::new()),
    };

    fn analyzer() -> Analyzer {
        Analyzer::new(LineParser::new().unwrap(), ActivityDetector::new())
    }

    #[test]
    fn test_login_burst_yields_single_alert() {
        let lines: Vec<String> = (0..5)
            .map(|i| {
                format!(
                    r#"10.0.0.1 - - [10/Jun/2025:10:00:0{} +0000] "GET /login HTTP/1.1" 403 200"#,
                    i
                )
            })
            .collect();

        let summary = analyzer().run(&lines);

        assert_eq!(summary.total_entries(), 5);
        assert_eq!(summary.alerts.len(), 1);
        assert_eq!(summary.alerts[0].kind, AlertKind::BruteForce);
        assert_eq!(summary.alerts[0].record, summary.records[4]);
        assert!(summary.alert_messages()[0].contains("10.0.0.1"));
    }

    #[test]
    fn test_rejected_lines_are_counted_not_recorded() {
        let lines = [
            "",
            "corrupt",
            r#"1.1.1.1 - - [10/Jun/2025:10:00:00 +0000] "GET /missing HTTP/1.1" 404 -"#,
        ];
        let summary = analyzer().run(lines);

        assert_eq!(summary.lines_read, 3);
        assert_eq!(summary.rejected_lines, 2);
        assert_eq!(summary.total_entries(), 1);
        assert_eq!(summary.alerts.len(), 1);
        assert_eq!(summary.alerts[0].kind, AlertKind::NotFoundProbe);
    }

    #[test]
    fn test_alerts_follow_input_order() {
        let lines = [
            r#"1.1.1.1 - - [10/Jun/2025:10:00:00 +0000] "GET /config HTTP/1.1" 200 1"#,
            r#"2.2.2.2 - - [10/Jun/2025:10:00:01 +0000] "GET /nope HTTP/1.1" 404 1"#,
            r#"3.3.3.3 - - [10/Jun/2025:10:00:02 +0000] "GET / HTTP/1.1" 200 1"#,
        ];
        let mut analyzer = analyzer();
        for line in lines {
            analyzer.process_line(line);
        }
        assert_eq!(analyzer.summary().alerts.len(), 2);
        assert_eq!(analyzer.detector().tracked_sources(), 0);

        let summary = analyzer.finish();
        assert_eq!(summary.alerts[0].kind, AlertKind::SensitivePath);
        assert_eq!(summary.alerts[1].kind, AlertKind::NotFoundProbe);
    }

    #[test]
    fn test_alerts_are_logged_below_info() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);

        let summary = analyzer().run([
            r#"4.4.4.4 - - [10/Jun/2025:10:00:00 +0000] "GET /quiet-logging-check HTTP/1.1" 404 1"#,
        ]);
        assert_eq!(summary.alerts.len(), 1);

        let entries = LOGGER.entries.lock().unwrap();
        let alert_entries: Vec<_> = entries
            .iter()
            .filter(|(_, msg)| msg.contains("/quiet-logging-check"))
            .collect();
        assert!(!alert_entries.is_empty());
        assert!(alert_entries.iter().all(|(level, _)| *level == log::Level::Debug));
    }
}
