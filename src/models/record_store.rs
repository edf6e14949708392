use super::LogRecord;

/// Every record parsed from one log file, in file order.
///
/// Built once per run and only read afterwards; detectors take `&RecordStore`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<LogRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        RecordStore { records: Vec::new() }
    }

    pub fn push(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogRecord> {
        self.records.iter()
    }

    /// Records that ended in a 401 response, in file order
    pub fn unauthorized(&self) -> impl Iterator<Item = &LogRecord> {
        self.records.iter().filter(|r| r.is_unauthorized())
    }
}

impl From<Vec<LogRecord>> for RecordStore {
    fn from(records: Vec<LogRecord>) -> Self {
        RecordStore { records }
    }
}

impl FromIterator<LogRecord> for RecordStore {
    fn from_iter<I: IntoIterator<Item = LogRecord>>(iter: I) -> Self {
        RecordStore {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a LogRecord;
    type IntoIter = std::slice::Iter<'a, LogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
