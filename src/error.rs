use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the I/O and configuration layers
///
/// The parser and detector never fail: malformed lines are simply
/// dropped, so nothing here originates from the analysis core.
#[derive(Error, Debug)]
pub enum SentinelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, SentinelError>;
