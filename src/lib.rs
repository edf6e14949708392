pub mod analysis;
pub mod config;
pub mod detection;
pub mod input;
pub mod models;
pub mod output;

// Re-export commonly used types
pub use analysis::{AnalysisError, Analyzer};
pub use detection::{BruteForceDetector, DetectionError, FailedLoginDetector, VolumeDetector};
pub use input::{AccessLogParser, InputError};
pub use models::{AddressCount, AnalysisReport, DetectionResult, LogRecord, RecordStore};
pub use output::{OutputFormat, OutputHandler};
