//! Access-log line parser
//!
//! Converts one line in the common access-log layout into a [`LogRecord`]:
//!
//! ```text
//! 127.0.0.1 - - [10/Jun/2025:10:30:00 +0100] "GET /index.html HTTP/1.1" 200 1234
//! ```
//!
//! The whole line must match. Anything else is rejected without error so
//! that corrupt or foreign lines mixed into a log simply disappear.

use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::Result;
use crate::models::{HttpMethod, LogRecord, ResponseSize, TIMESTAMP_FORMAT};

const ACCESS_LOG_PATTERN: &str = concat!(
    r"^",
    // IPv4 address, syntax only
    r"(?P<ip>[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}) ",
    // remote identity and user, ignored
    r"\S+ \S+ ",
    r"\[(?P<datetime>[^\]]+)\] ",
    r#"""#,
    r"(?P<method>GET|POST|PUT|DELETE|HEAD|OPTIONS|PATCH|CONNECT|TRACE) ",
    // path, query, fragment
    r"(?P<path>(?:/[^\s?#]*)?(?:\?[^\s#]*)?(?:#\S*)?) ",
    // protocol, ignored
    r#"\S+" "#,
    r"(?P<status>[0-9]{3}) ",
    r"(?P<size>[0-9]+|-)",
    r"$",
);

/// Stateless parser for access-log lines
///
/// Holds only the compiled pattern, so one instance can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct LineParser {
    pattern: Regex,
}

impl LineParser {
    /// Compile the access-log grammar
    pub fn new() -> Result<Self> {
        Ok(LineParser {
            pattern: Regex::new(ACCESS_LOG_PATTERN)?,
        })
    }

    /// Parse a single line, returning `None` if it does not match the grammar
    ///
    /// A trailing line terminator is stripped first.
    pub fn parse(&self, line: &str) -> Option<LogRecord> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return None;
        }

        let caps = self.pattern.captures(line)?;

        let datetime = Self::parse_timestamp(&caps["datetime"])?;
        let method = caps["method"].parse::<HttpMethod>().ok()?;
        let size = caps["size"].parse::<ResponseSize>().ok()?;

        Some(LogRecord {
            ip: caps["ip"].to_string(),
            datetime,
            method,
            path: caps["path"].to_string(),
            status: caps["status"].to_string(),
            size,
        })
    }

    /// Parse every line in order, dropping the ones that do not match
    pub fn parse_all<I, S>(&self, lines: I) -> Vec<LogRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .filter_map(|line| self.parse(line.as_ref()))
            .collect()
    }

    // Only the part before the first space is a date; the offset is dropped.
    fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
        let date_part = raw.split(' ').next()?;
        NaiveDateTime::parse_from_str(date_part, TIMESTAMP_FORMAT).ok()
    }
}
