//! Failed login tally
//!
//! Counts 401 responses per source address with no threshold applied.

use std::collections::HashMap;
use crate::models::{AddressCount, DetectionResult, RecordStore};

/// Counts unauthorized responses per source address
#[derive(Debug, Clone, Copy, Default)]
pub struct FailedLoginDetector;

impl FailedLoginDetector {
    pub fn new() -> Self {
        FailedLoginDetector
    }

    /// Tally 401 records per address.
    ///
    /// Entries appear in the order each address first produced a 401.
    pub fn detect(&self, store: &RecordStore) -> DetectionResult {
        let mut position: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<AddressCount> = Vec::new();

        for record in store.unauthorized() {
            match position.get(record.source_address.as_str()) {
                Some(&idx) => entries[idx].count += 1,
                None => {
                    position.insert(record.source_address.as_str(), entries.len());
                    entries.push(AddressCount {
                        address: record.source_address.clone(),
                        count: 1,
                    });
                }
            }
        }

        DetectionResult::from_entries(entries)
    }
}
