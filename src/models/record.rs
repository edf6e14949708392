use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// chrono format of the bracketed access log timestamp, e.g. `10/Dec/2024:13:55:42 +0000`
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// HTTP status recorded for a rejected authentication, compared as captured text
pub const STATUS_UNAUTHORIZED: &str = "401";

/// One access log line that matched the extraction pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub source_address: String,
    /// Raw bracketed timestamp, parsed on demand
    pub timestamp: String,
    pub request_line: String,
    /// Status digits exactly as logged, so `0401` is not a 401
    pub status_code: String,
    /// `None` when the logged size does not fit a `u64`
    pub response_size: Option<u64>,
}

impl LogRecord {
    /// Parse the raw timestamp into a date-time carrying its UTC offset
    pub fn parsed_timestamp(&self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code == STATUS_UNAUTHORIZED
    }

    /// Status as a number, when it fits a `u16`
    pub fn status(&self) -> Option<u16> {
        self.status_code.parse().ok()
    }
}
