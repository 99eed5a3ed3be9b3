use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SentinelError};

/// Longest brute-force window accepted, one week
pub const MAX_WINDOW_MINUTES: i64 = 7 * 24 * 60;

/// Configuration for an analysis run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input source configuration
    pub input: InputConfig,
    /// Detection rules configuration
    pub detection: DetectionConfig,
    /// Output configuration
    pub output: OutputConfig,
}

/// Input source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Access log to analyse
    pub file_path: Option<PathBuf>,
    /// Number of lines written when a synthetic log is generated
    pub generate_lines: usize,
}

/// Detection rules configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// 401/403 responses from one address that raise a brute-force alert
    pub failure_threshold: usize,
    /// Sliding window, in minutes, that failures are counted over
    pub window_minutes: i64,
    /// Case-insensitive path fragments that raise a sensitive-path alert
    pub sensitive_paths: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON dump of parsed records
    pub records_json: Option<PathBuf>,
    /// Plain-text summary report
    pub report_path: Option<PathBuf>,
    /// Alert format: "text", "json", or "jsonl"
    pub alert_format: String,
    /// Alert log file; alerts go to stdout when unset
    pub alert_log: Option<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            file_path: None,
            generate_lines: 50,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            failure_threshold: 5,
            window_minutes: 1,
            sensitive_paths: ["/admin", "/login", "/config", "/etc/passwd"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            records_json: Some(PathBuf::from("parsed_logs.json")),
            report_path: Some(PathBuf::from("report.txt")),
            alert_format: "text".to_string(),
            alert_log: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SentinelError::FileNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject settings the detector cannot work with
    pub fn validate(&self) -> Result<()> {
        self.detection.validate()
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.failure_threshold == 0 {
            return Err(SentinelError::InvalidConfig(
                "failure_threshold must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_WINDOW_MINUTES).contains(&self.window_minutes) {
            return Err(SentinelError::InvalidConfig(format!(
                "window_minutes must be between 1 and {}, got {}",
                MAX_WINDOW_MINUTES, self.window_minutes
            )));
        }
        if self.sensitive_paths.iter().any(|p| p.trim().is_empty()) {
            return Err(SentinelError::InvalidConfig(
                "sensitive_paths entries must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::default();
        config.to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[detection]\nfailure_threshold = 3\n").unwrap();
        assert_eq!(config.detection.failure_threshold, 3);
        assert_eq!(config.detection.window_minutes, 1);
        assert_eq!(config.detection.sensitive_paths.len(), 4);
        assert_eq!(config.output.alert_format, "text");
        assert_eq!(config.input.file_path, None);
    }

    #[test]
    fn test_validate_rejects_bad_detection_settings() {
        let mut config = Config::default();
        config.detection.failure_threshold = 0;
        assert!(matches!(config.validate(), Err(SentinelError::InvalidConfig(_))));

        let mut config = Config::default();
        config.detection.window_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.detection.sensitive_paths.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, SentinelError::FileNotFound(_)));
    }
}
