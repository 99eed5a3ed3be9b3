pub mod records;
pub mod report;

pub use records::{read_records_json, write_records_json};
pub use report::{render_text_report, write_text_report};

use crate::error::Result;
use crate::models::Alert;
use chrono::NaiveDateTime;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Writes alerts as they are raised, to a log file or stdout
pub struct AlertSink {
    format: OutputFormat,
    writer: Option<Box<dyn Write + Send>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Jsonl,
}

impl OutputFormat {
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "text" => OutputFormat::Text,
            "json" => OutputFormat::Json,
            "jsonl" => OutputFormat::Jsonl,
            other => {
                log::warn!("Unknown alert format {:?}, using text", other);
                OutputFormat::Text
            }
        }
    }
}

impl AlertSink {
    /// Create a sink; alerts are appended to `file_path` or printed when it is `None`
    pub fn new(format: OutputFormat, file_path: Option<PathBuf>) -> Result<Self> {
        let writer: Option<Box<dyn Write + Send>> = match file_path {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Some(Box::new(BufWriter::new(file)))
            }
            None => None,
        };

        Ok(AlertSink { format, writer })
    }

    /// Write an alert stamped with the current local time
    pub fn write_alert(&mut self, alert: &Alert) -> Result<()> {
        let now = chrono::Local::now().naive_local();
        let output = self.format_alert(alert, now)?;
        self.write_output(&output)
    }

    /// Render one alert, including the trailing newline
    pub fn format_alert(&self, alert: &Alert, now: NaiveDateTime) -> Result<String> {
        let output = match self.format {
            OutputFormat::Text => format!(
                "[{}] ALERT: {}\n",
                now.format("%Y-%m-%d %H:%M:%S"),
                alert.message
            ),
            OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(alert)?),
            OutputFormat::Jsonl => format!("{}\n", serde_json::to_string(alert)?),
        };
        Ok(output)
    }

    fn write_output(&mut self, data: &str) -> Result<()> {
        match &mut self.writer {
            Some(writer) => {
                writer.write_all(data.as_bytes())?;
                writer.flush()?;
            }
            None => {
                print!("{}", data);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }

    /// Flush any buffered output
    pub fn flush(&mut self) -> Result<()> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}
