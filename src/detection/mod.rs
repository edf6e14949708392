pub mod brute_force;
pub mod failed_login;
pub mod volume;

pub use brute_force::{BruteForceDetector, DEFAULT_FAILED_ATTEMPT_THRESHOLD};
pub use failed_login::FailedLoginDetector;
pub use volume::{VolumeDetector, DEFAULT_VOLUME_THRESHOLD};

use thiserror::Error;

/// Errors that can occur while running a detector
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Invalid timestamp '{value}' (expected DD/Mon/YYYY:HH:MM:SS +ZZZZ): {source}")]
    TimestampFormat {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Brute force window must be at least one second")]
    InvalidWindow,
}
