pub mod access_log;

pub use access_log::AccessLogParser;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a log file
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Cannot read log file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
