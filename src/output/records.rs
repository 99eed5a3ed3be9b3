use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Result, SentinelError};
use crate::models::LogRecord;

/// Dump parsed records as a pretty-printed JSON list
pub fn write_records_json(path: &Path, records: &[LogRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    log::info!("Wrote {} record(s) to {:?}", records.len(), path);
    Ok(())
}

/// Load records previously written by [`write_records_json`]
pub fn read_records_json(path: &Path) -> Result<Vec<LogRecord>> {
    if !path.exists() {
        return Err(SentinelError::FileNotFound(path.to_path_buf()));
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
