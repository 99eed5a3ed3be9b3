use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::error::{Result, SentinelError};

/// Reads an access log in one pass
pub struct LogFileReader {
    file_path: PathBuf,
}

impl LogFileReader {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        LogFileReader {
            file_path: file_path.into(),
        }
    }

    /// Read every line with its terminator stripped
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than failing the
    /// read; such lines will not parse and are dropped downstream.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        if !self.file_path.exists() {
            return Err(SentinelError::FileNotFound(self.file_path.clone()));
        }

        let file = File::open(&self.file_path)?;
        let mut reader = BufReader::new(file);
        let mut lines = Vec::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let bytes_read = reader.read_until(b'\n', &mut buf)?;
            if bytes_read == 0 {
                break; // EOF
            }

            let line = String::from_utf8_lossy(&buf);
            lines.push(line.trim_end_matches(['\r', '\n']).to_string());
        }

        log::info!("Read {} line(s) from {:?}", lines.len(), self.file_path);
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_lines_strips_terminators() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"first\r\nsecond\n\nlast").unwrap();

        let lines = LogFileReader::new(file.path()).read_lines().unwrap();
        assert_eq!(lines, vec!["first", "second", "", "last"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"ok\n\xff\xfe bad\n").unwrap();

        let lines = LogFileReader::new(file.path()).read_lines().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "ok");
        assert!(lines[1].ends_with(" bad"));
    }

    #[test]
    fn test_missing_file() {
        let err = LogFileReader::new("/nonexistent/access.log")
            .read_lines()
            .unwrap_err();
        assert!(matches!(err, SentinelError::FileNotFound(_)));
    }
}
