pub mod analysis;
pub mod config;
pub mod detection;
pub mod error;
pub mod input;
pub mod models;
pub mod output;
pub mod parser;

// Re-export commonly used types
pub use analysis::{AnalysisSummary, Analyzer};
pub use config::Config;
pub use detection::ActivityDetector;
pub use error::SentinelError;
pub use models::{Alert, AlertKind, HttpMethod, LogRecord, ResponseSize};
pub use parser::LineParser;
