use std::fmt;

use serde::{Deserialize, Serialize};

use super::LogRecord;

/// Which detection rule produced an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    BruteForce,
    SensitivePath,
    NotFoundProbe,
}

impl AlertKind {
    pub fn rule_name(&self) -> &'static str {
        match self {
            AlertKind::BruteForce => "Brute Force",
            AlertKind::SensitivePath => "Sensitive Path Access",
            AlertKind::NotFoundProbe => "Not Found Probing",
        }
    }
}

/// An alert raised by the detector together with the record that triggered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub record: LogRecord,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
