//! Batch analysis pipeline
//!
//! Parses one access log into a [`RecordStore`] and runs every detector over it.

use std::path::Path;
use thiserror::Error;

use crate::config::DetectionConfig;
use crate::detection::{BruteForceDetector, DetectionError, FailedLoginDetector, VolumeDetector};
use crate::input::{AccessLogParser, InputError};
use crate::models::{AnalysisReport, RecordStore};

/// Errors that stop an analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("No valid log entries found in {0}")]
    EmptyLog(String),

    #[error(transparent)]
    Detection(#[from] DetectionError),
}

/// Runs the three detectors over one log
pub struct Analyzer {
    failed_logins: FailedLoginDetector,
    volume: VolumeDetector,
    brute_force: BruteForceDetector,
}

impl Analyzer {
    /// Create an analyzer with default thresholds
    pub fn new() -> Self {
        Analyzer {
            failed_logins: FailedLoginDetector::new(),
            volume: VolumeDetector::new(),
            brute_force: BruteForceDetector::new(),
        }
    }

    pub fn with_config(config: &DetectionConfig) -> Self {
        let brute_force = match config.brute_force_window_seconds {
            Some(window) => BruteForceDetector::with_window(config.brute_force_threshold, window),
            None => BruteForceDetector::with_threshold(config.brute_force_threshold),
        };

        Analyzer {
            failed_logins: FailedLoginDetector::new(),
            volume: VolumeDetector::with_threshold(config.volume_threshold),
            brute_force,
        }
    }

    /// Parse the log at `path` and analyze it.
    ///
    /// Stops before detection when the file cannot be read or yields no records.
    pub fn run(&self, path: &Path) -> Result<AnalysisReport, AnalysisError> {
        let store = AccessLogParser::new(path.to_path_buf()).parse()?;
        self.analyze_store(&path.display().to_string(), &store)
    }

    /// Analyze an already parsed store
    pub fn analyze_store(
        &self,
        source: &str,
        store: &RecordStore,
    ) -> Result<AnalysisReport, AnalysisError> {
        if store.is_empty() {
            return Err(AnalysisError::EmptyLog(source.to_string()));
        }

        log::info!("Analyzing {} record(s) from {}", store.len(), source);

        let failed_logins = self.failed_logins.detect(store);
        log::debug!(
            "{} failed login(s) from {} address(es)",
            failed_logins.total(),
            failed_logins.len()
        );

        let high_volume = self.volume.detect(store);
        log::debug!(
            "{} address(es) above {} requests",
            high_volume.len(),
            self.volume.threshold()
        );

        let brute_force = self.brute_force.detect(store)?;
        log::debug!(
            "{} address(es) above {} failed logins",
            brute_force.len(),
            self.brute_force.threshold()
        );

        if !brute_force.is_empty() {
            log::warn!(
                "Possible brute force from {} address(es): {}",
                brute_force.len(),
                brute_force.addresses().join(", ")
            );
        }

        Ok(AnalysisReport {
            source: source.to_string(),
            total_records: store.len(),
            failed_logins,
            high_volume,
            brute_force,
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogRecord;

    fn create_record(ip: &str, timestamp: &str, status_code: u16) -> LogRecord {
        LogRecord {
            source_address: ip.to_string(),
            timestamp: timestamp.to_string(),
            request_line: "GET / HTTP/1.1".to_string(),
            status_code: status_code.to_string(),
            response_size: Some(100),
        }
    }

    /// A: one success, B: two 401s, C: two successes
    fn scenario_store() -> RecordStore {
        vec![
            create_record("192.168.1.1", "10/Dec/2024:13:55:42 +0000", 200),
            create_record("192.168.1.2", "10/Dec/2024:14:12:05 +0000", 401),
            create_record("192.168.1.2", "10/Dec/2024:14:12:06 +0000", 401),
            create_record("192.168.1.3", "10/Dec/2024:14:15:00 +0000", 200),
            create_record("192.168.1.3", "10/Dec/2024:14:16:00 +0000", 200),
        ]
        .into()
    }

    #[test]
    fn test_scenario() {
        let config = DetectionConfig {
            volume_threshold: 1,
            brute_force_threshold: 1,
            brute_force_window_seconds: None,
        };
        let report = Analyzer::with_config(&config)
            .analyze_store("scenario", &scenario_store())
            .unwrap();

        assert_eq!(report.total_records, 5);
        assert_eq!(report.failed_logins.addresses(), vec!["192.168.1.2"]);
        assert_eq!(report.failed_logins.get("192.168.1.2"), Some(2));

        assert!(report.high_volume.contains("192.168.1.3"));
        assert!(!report.high_volume.contains("192.168.1.1"));

        assert_eq!(report.brute_force.addresses(), vec!["192.168.1.2"]);
    }

    #[test]
    fn test_empty_store_skips_detection() {
        let err = Analyzer::new()
            .analyze_store("empty.log", &RecordStore::new())
            .unwrap_err();

        assert!(matches!(err, AnalysisError::EmptyLog(ref s) if s == "empty.log"));
    }

    #[test]
    fn test_bad_timestamp_surfaces_as_detection_error() {
        let store: RecordStore = vec![create_record("10.0.0.1", "yesterday", 401)].into();
        let err = Analyzer::new().analyze_store("bad.log", &store).unwrap_err();

        assert!(matches!(err, AnalysisError::Detection(_)));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let err = Analyzer::new()
            .run(Path::new("/nonexistent/access.log"))
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Input(_)));
    }
}
