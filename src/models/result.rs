//! Detector output types
//!
//! A detection result is an ordered list of per-address counts. The order is
//! part of the output contract: renderers print entries exactly as stored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single address and the number of matching records it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCount {
    pub address: String,
    pub count: usize,
}

/// Ordered mapping of source address to count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionResult {
    entries: Vec<AddressCount>,
}

impl DetectionResult {
    /// Build a result preserving the given entry order
    pub fn from_entries(entries: Vec<AddressCount>) -> Self {
        DetectionResult { entries }
    }

    /// Build a result ordered by descending count, ties broken by ascending address
    pub fn ranked(counts: HashMap<String, usize>) -> Self {
        let mut entries: Vec<AddressCount> = counts
            .into_iter()
            .map(|(address, count)| AddressCount { address, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.address.cmp(&b.address)));
        DetectionResult { entries }
    }

    /// Keep only entries whose count is strictly greater than `threshold`
    pub fn above(mut self, threshold: usize) -> Self {
        self.entries.retain(|e| e.count > threshold);
        self
    }

    pub fn get(&self, address: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.address == address)
            .map(|e| e.count)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.get(address).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AddressCount> {
        self.entries.iter()
    }

    pub fn addresses(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.address.as_str()).collect()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }
}

impl<'a> IntoIterator for &'a DetectionResult {
    type Item = &'a AddressCount;
    type IntoIter = std::slice::Iter<'a, AddressCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Combined output of one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Where the records came from (file path or caller-supplied label)
    pub source: String,
    pub total_records: usize,
    pub failed_logins: DetectionResult,
    pub high_volume: DetectionResult,
    pub brute_force: DetectionResult,
}
