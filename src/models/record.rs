use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Timestamp layout used inside the bracketed log field and in the JSON dump
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// HTTP methods accepted in the request line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Connect,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 9] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Patch,
        HttpMethod::Connect,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Case-sensitive, as in the request line itself
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown HTTP method: {}", s))
    }
}

/// Response body size; `-` in the log line means no body was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSize {
    Bytes(u64),
    Absent,
}

impl fmt::Display for ResponseSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseSize::Bytes(n) => write!(f, "{}", n),
            ResponseSize::Absent => f.write_str("-"),
        }
    }
}

impl FromStr for ResponseSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(ResponseSize::Absent);
        }
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("invalid response size: {}", s));
        }
        s.parse::<u64>()
            .map(ResponseSize::Bytes)
            .map_err(|e| format!("invalid response size {}: {}", s, e))
    }
}

// Serialized exactly as it appears in the log line: digits or "-".
impl Serialize for ResponseSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResponseSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One successfully parsed access-log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Dotted-quad source address, checked only syntactically
    pub ip: String,
    /// Naive local time; the offset in the log line is discarded
    #[serde(with = "log_timestamp")]
    pub datetime: NaiveDateTime,
    pub method: HttpMethod,
    /// Request target including query and fragment, undecoded
    pub path: String,
    /// Three-digit status code as it appeared in the line
    pub status: String,
    pub size: ResponseSize,
}

impl LogRecord {
    /// 401 Unauthorized or 403 Forbidden
    pub fn is_auth_failure(&self) -> bool {
        self.status == "401" || self.status == "403"
    }

    pub fn is_not_found(&self) -> bool {
        self.status == "404"
    }
}

mod log_timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&dt.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> LogRecord {
        LogRecord {
            ip: "10.0.0.1".to_string(),
            datetime: NaiveDate::from_ymd_opt(2025, 6, 10)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            method: HttpMethod::Get,
            path: "/index.html?q=1".to_string(),
            status: "200".to_string(),
            size: ResponseSize::Absent,
        }
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("PATCH".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("get".parse::<HttpMethod>().is_err());
        assert!("BREW".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_response_size_from_str() {
        assert_eq!("-".parse::<ResponseSize>().unwrap(), ResponseSize::Absent);
        assert_eq!("512".parse::<ResponseSize>().unwrap(), ResponseSize::Bytes(512));
        assert!("".parse::<ResponseSize>().is_err());
        assert!("+5".parse::<ResponseSize>().is_err());
        assert!("99999999999999999999999".parse::<ResponseSize>().is_err());
    }

    #[test]
    fn test_record_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["ip"], "10.0.0.1");
        assert_eq!(value["datetime"], "10/Jun/2025:10:00:00");
        assert_eq!(value["method"], "GET");
        assert_eq!(value["path"], "/index.html?q=1");
        assert_eq!(value["status"], "200");
        assert_eq!(value["size"], "-");
    }

    #[test]
    fn test_status_helpers() {
        let mut record = sample();
        assert!(!record.is_auth_failure());
        record.status = "403".to_string();
        assert!(record.is_auth_failure());
        record.status = "404".to_string();
        assert!(record.is_not_found());
    }
}
