use std::collections::HashMap;
use crate::models::{DetectionResult, RecordStore};

/// Default request count an address must exceed to be reported
pub const DEFAULT_VOLUME_THRESHOLD: usize = 100;

/// Flags addresses that sent more requests than a threshold
#[derive(Debug, Clone)]
pub struct VolumeDetector {
    threshold: usize,
}

impl VolumeDetector {
    /// Create a detector with the default threshold
    pub fn new() -> Self {
        VolumeDetector {
            threshold: DEFAULT_VOLUME_THRESHOLD,
        }
    }

    pub fn with_threshold(threshold: usize) -> Self {
        VolumeDetector { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Count every record per address and keep counts strictly above the threshold.
    ///
    /// Ordered by descending count, ties by ascending address.
    pub fn detect(&self, store: &RecordStore) -> DetectionResult {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in store {
            *counts.entry(record.source_address.clone()).or_insert(0) += 1;
        }

        DetectionResult::ranked(counts).above(self.threshold)
    }
}

impl Default for VolumeDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogRecord;

    fn create_store(pairs: &[(&str, usize)]) -> RecordStore {
        let mut store = RecordStore::new();
        for (ip, n) in pairs {
            for i in 0..*n {
                store.push(LogRecord {
                    source_address: ip.to_string(),
                    timestamp: "10/Dec/2024:14:15:00 +0000".to_string(),
                    request_line: "GET /dashboard HTTP/1.1".to_string(),
                    status_code: if i % 2 == 0 { "200" } else { "401" }.to_string(),
                    response_size: Some(1234),
                });
            }
        }
        store
    }

    #[test]
    fn test_default_threshold() {
        assert_eq!(VolumeDetector::new().threshold(), 100);

        let store = create_store(&[("10.0.0.1", 100), ("10.0.0.2", 101)]);
        let result = VolumeDetector::default().detect(&store);

        assert_eq!(result.addresses(), vec!["10.0.0.2"]);
        assert_eq!(result.get("10.0.0.2"), Some(101));
    }

    #[test]
    fn test_threshold_is_strict() {
        let store = create_store(&[("10.0.0.1", 3), ("10.0.0.2", 4)]);
        let result = VolumeDetector::with_threshold(3).detect(&store);

        assert!(!result.contains("10.0.0.1"));
        assert!(result.contains("10.0.0.2"));
    }

    #[test]
    fn test_counts_all_statuses() {
        let store = create_store(&[("10.0.0.1", 6)]);
        let result = VolumeDetector::with_threshold(5).detect(&store);

        assert_eq!(result.get("10.0.0.1"), Some(6));
    }

    #[test]
    fn test_descending_order_with_address_tiebreak() {
        let store = create_store(&[
            ("10.0.0.3", 2),
            ("10.0.0.1", 5),
            ("10.0.0.2", 2),
            ("10.0.0.4", 1),
        ]);
        let result = VolumeDetector::with_threshold(1).detect(&store);

        assert_eq!(result.addresses(), vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    }

    #[test]
    fn test_raising_threshold_never_adds_addresses() {
        let store = create_store(&[("a", 1), ("b", 3), ("c", 5), ("d", 8)]);

        let mut previous = VolumeDetector::with_threshold(0).detect(&store);
        for threshold in 1..10 {
            let current = VolumeDetector::with_threshold(threshold).detect(&store);
            assert!(current.iter().all(|e| previous.contains(&e.address)));
            previous = current;
        }
        assert!(previous.is_empty());
    }
}
