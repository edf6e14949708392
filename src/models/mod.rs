pub mod record;
pub mod record_store;
pub mod result;

pub use record::{LogRecord, STATUS_UNAUTHORIZED, TIMESTAMP_FORMAT};
pub use record_store::RecordStore;
pub use result::{AddressCount, AnalysisReport, DetectionResult};
