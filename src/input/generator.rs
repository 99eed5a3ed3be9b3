//! Synthetic access-log generation for trying the analyser out

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Result;
use crate::models::TIMESTAMP_FORMAT;

const IP_ADDRESSES: [&str; 4] = ["192.168.1.1", "172.1.5.3", "192.168.0.57", "127.0.0.1"];
const STATUSES: [&str; 4] = ["200", "404", "403", "429"];
const PATHS: [&str; 4] = ["/login", "/admin", "/index.html", "/dashboard"];
const METHODS: [&str; 5] = ["POST", "GET", "DELETE", "PUT", "HEAD"];
const RESPONSE_SIZE: u64 = 512;

/// Produces random lines in the access-log grammar
pub struct LogGenerator<R: Rng> {
    rng: R,
    current: NaiveDateTime,
}

impl<R: Rng> LogGenerator<R> {
    /// Timestamps start at `start` and advance 0-2 seconds per line
    pub fn new(rng: R, start: NaiveDateTime) -> Self {
        LogGenerator { rng, current: start }
    }

    pub fn next_line(&mut self) -> String {
        let ip = Self::pick(&mut self.rng, &IP_ADDRESSES);
        let status = Self::pick(&mut self.rng, &STATUSES);
        let path = Self::pick(&mut self.rng, &PATHS);
        let method = Self::pick(&mut self.rng, &METHODS);

        let line = format!(
            r#"{} - - [{} +0000] "{} {} HTTP/1.1" {} {}"#,
            ip,
            self.current.format(TIMESTAMP_FORMAT),
            method,
            path,
            status,
            RESPONSE_SIZE
        );

        self.current += Duration::seconds(self.rng.gen_range(0..3));
        line
    }

    pub fn generate(&mut self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.next_line()).collect()
    }

    /// Write `count` lines to `path`, replacing any existing file
    pub fn write_to_file(&mut self, path: &Path, count: usize) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for _ in 0..count {
            writeln!(writer, "{}", self.next_line())?;
        }
        writer.flush()?;
        log::info!("Generated {} synthetic line(s) in {:?}", count, path);
        Ok(())
    }

    fn pick(rng: &mut R, pool: &[&'static str]) -> &'static str {
        // Pools are non-empty constants
        pool.choose(rng).copied().unwrap_or(pool[0])
    }
}
