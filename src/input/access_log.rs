use crate::input::InputError;
use crate::models::{LogRecord, RecordStore};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `<ip> - - [<timestamp>] "<request>" <status> <size>`, matched anywhere in the line
static RE_ACCESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<ip>\d+\.\d+\.\d+\.\d+) - - \[(?P<date>.+?)\] "(?P<request>.*?)" (?P<status>\d+) (?P<size>\d+)"#,
    )
    .expect("regex")
});

/// Reads an access log file into a [`RecordStore`]
pub struct AccessLogParser {
    file_path: PathBuf,
}

impl AccessLogParser {
    /// Create a parser for the given log file
    pub fn new(file_path: PathBuf) -> Self {
        AccessLogParser { file_path }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Parse the whole file, failing if it cannot be opened or read
    pub fn parse(&self) -> Result<RecordStore, InputError> {
        let file = File::open(&self.file_path).map_err(|source| InputError::Io {
            path: self.file_path.clone(),
            source,
        })?;

        let store = Self::parse_reader(BufReader::new(file)).map_err(|source| InputError::Io {
            path: self.file_path.clone(),
            source,
        })?;

        log::info!(
            "Parsed {} record(s) from {}",
            store.len(),
            self.file_path.display()
        );
        Ok(store)
    }

    /// Parse the file, reporting a read failure and returning an empty store instead
    pub fn load(&self) -> RecordStore {
        match self.parse() {
            Ok(store) => store,
            Err(e) => {
                log::error!("{}", e);
                RecordStore::new()
            }
        }
    }

    /// Parse every line of `reader`, keeping only lines that match the access pattern
    pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<RecordStore, std::io::Error> {
        let mut store = RecordStore::new();
        let mut buf = Vec::new();
        let mut lines_read = 0usize;

        loop {
            buf.clear();
            let bytes_read = reader.read_until(b'\n', &mut buf)?;
            if bytes_read == 0 {
                break; // EOF
            }
            lines_read += 1;

            let line = String::from_utf8_lossy(&buf);
            if let Some(record) = Self::parse_line(&line) {
                store.push(record);
            }
        }

        let skipped = lines_read - store.len();
        if skipped > 0 {
            log::debug!("Skipped {} line(s) not matching the access log pattern", skipped);
        }

        Ok(store)
    }

    /// Parse a single access log line.
    ///
    /// Returns `None` only when the line does not match. Every matching line
    /// becomes a record; the status is kept as logged and an oversized
    /// response size is recorded as `None`.
    pub fn parse_line(line: &str) -> Option<LogRecord> {
        let caps = RE_ACCESS_LINE.captures(line)?;

        Some(LogRecord {
            source_address: caps["ip"].to_string(),
            timestamp: caps["date"].to_string(),
            request_line: caps["request"].to_string(),
            status_code: caps["status"].to_string(),
            response_size: caps["size"].parse::<u64>().ok(),
        })
    }

    /// Check if the file still exists
    pub fn is_valid(&self) -> bool {
        self.file_path.exists()
    }
}
