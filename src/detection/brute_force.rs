//! Brute force detection
//!
//! Flags source addresses with more failed logins than a threshold.
//!
//! Detection runs in two phases. Every record's timestamp is parsed first and
//! a single malformed timestamp aborts the whole run, even though the
//! count-only mode never looks at the parsed values. The 401 records are then
//! grouped per address and counted. When a window is configured the count is
//! the densest burst of failures inside that window rather than the total.

use std::collections::HashMap;
use chrono::{DateTime, FixedOffset};
use crate::detection::DetectionError;
use crate::models::{DetectionResult, LogRecord, RecordStore};

/// Default failed login count an address must exceed to be reported
pub const DEFAULT_FAILED_ATTEMPT_THRESHOLD: usize = 5;

/// Detects addresses repeatedly failing authentication
#[derive(Debug, Clone)]
pub struct BruteForceDetector {
    /// Failed logins an address must exceed
    failed_attempt_threshold: usize,
    /// Optional sliding window in seconds (None = count over the whole log)
    window_seconds: Option<u64>,
}

impl BruteForceDetector {
    /// Create a detector with the default threshold and no window
    pub fn new() -> Self {
        BruteForceDetector {
            failed_attempt_threshold: DEFAULT_FAILED_ATTEMPT_THRESHOLD,
            window_seconds: None,
        }
    }

    pub fn with_threshold(failed_attempt_threshold: usize) -> Self {
        BruteForceDetector {
            failed_attempt_threshold,
            window_seconds: None,
        }
    }

    /// Count failures inside a sliding window of `window_seconds`
    pub fn with_window(failed_attempt_threshold: usize, window_seconds: u64) -> Self {
        BruteForceDetector {
            failed_attempt_threshold,
            window_seconds: Some(window_seconds),
        }
    }

    pub fn threshold(&self) -> usize {
        self.failed_attempt_threshold
    }

    pub fn window_seconds(&self) -> Option<u64> {
        self.window_seconds
    }

    /// Run detection over the store.
    ///
    /// # Errors
    ///
    /// Returns [`DetectionError::InvalidWindow`] for a zero-second window and
    /// [`DetectionError::TimestampFormat`] for the first record whose
    /// timestamp is not `DD/Mon/YYYY:HH:MM:SS ±HHMM`.
    pub fn detect(&self, store: &RecordStore) -> Result<DetectionResult, DetectionError> {
        if self.window_seconds == Some(0) {
            return Err(DetectionError::InvalidWindow);
        }

        let timed = Self::parse_timestamps(store)?;

        let counts = match self.window_seconds {
            None => Self::count_failures(&timed),
            Some(window) => Self::count_failure_bursts(&timed, window),
        };

        Ok(DetectionResult::ranked(counts).above(self.failed_attempt_threshold))
    }

    /// Parse every record's timestamp, stopping at the first one that does not parse
    fn parse_timestamps(
        store: &RecordStore,
    ) -> Result<Vec<(&LogRecord, DateTime<FixedOffset>)>, DetectionError> {
        store
            .iter()
            .map(|record| {
                record
                    .parsed_timestamp()
                    .map(|ts| (record, ts))
                    .map_err(|source| DetectionError::TimestampFormat {
                        value: record.timestamp.clone(),
                        source,
                    })
            })
            .collect()
    }

    fn count_failures(timed: &[(&LogRecord, DateTime<FixedOffset>)]) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for (record, _) in timed.iter().filter(|(r, _)| r.is_unauthorized()) {
            *counts.entry(record.source_address.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Largest number of failures per address whose timestamps fit in the window.
    ///
    /// An earlier failure is still inside the window while `t > latest - window`.
    fn count_failure_bursts(
        timed: &[(&LogRecord, DateTime<FixedOffset>)],
        window_seconds: u64,
    ) -> HashMap<String, usize> {
        // windows beyond i64 seconds already span every representable timestamp
        let window = i64::try_from(window_seconds).unwrap_or(i64::MAX);

        let mut per_address: HashMap<&str, Vec<i64>> = HashMap::new();
        for (record, ts) in timed.iter().filter(|(r, _)| r.is_unauthorized()) {
            per_address
                .entry(record.source_address.as_str())
                .or_default()
                .push(ts.timestamp());
        }

        per_address
            .into_iter()
            .map(|(address, mut times)| {
                times.sort_unstable();

                let mut start = 0;
                let mut burst = 0;
                for end in 0..times.len() {
                    let cutoff = times[end].saturating_sub(window);
                    while start < end && times[start] <= cutoff {
                        start += 1;
                    }
                    burst = burst.max(end - start + 1);
                }

                (address.to_string(), burst)
            })
            .collect()
    }
}

impl Default for BruteForceDetector {
    fn default() -> Self {
        Self::new()
    }
}
