pub mod chart;

pub use chart::ChartWriter;

use crate::models::{AnalysisReport, DetectionResult};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing a report
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Chart error: {0}")]
    Chart(String),
}

/// Output handler for analysis reports
pub struct OutputHandler {
    format: OutputFormat,
    writer: Option<Box<dyn Write + Send>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Jsonl,
    Console,
}

impl OutputFormat {
    /// Map a format name to a format, falling back to console
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "jsonl" => OutputFormat::Jsonl,
            "console" => OutputFormat::Console,
            other => {
                log::warn!("Unknown output format '{}', using console", other);
                OutputFormat::Console
            }
        }
    }
}

impl OutputHandler {
    /// Create a new output handler writing to `file_path`, or stdout when absent
    pub fn new(format: OutputFormat, file_path: Option<PathBuf>) -> Result<Self, OutputError> {
        let writer: Option<Box<dyn Write + Send>> = match file_path {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                Some(Box::new(BufWriter::new(file)))
            }
            None => None,
        };

        Ok(OutputHandler { format, writer })
    }

    /// Write an analysis report
    pub fn write_report(&mut self, report: &AnalysisReport) -> Result<(), OutputError> {
        let output = match self.format {
            OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(report)?),
            OutputFormat::Jsonl => format!("{}\n", serde_json::to_string(report)?),
            OutputFormat::Console => render_console(report),
        };
        self.write_output(&output)
    }

    fn write_output(&mut self, data: &str) -> Result<(), OutputError> {
        match &mut self.writer {
            Some(writer) => {
                writer.write_all(data.as_bytes())?;
                writer.flush()?;
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }

    /// Flush any buffered output
    pub fn flush(&mut self) -> Result<(), OutputError> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Render a report as plain text, one section per detector.
///
/// Empty sections print only their header.
pub fn render_console(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str("\nFailed Login Attempts:\n");
    for entry in &report.failed_logins {
        let _ = writeln!(out, "{}: {} times", entry.address, entry.count);
    }

    out.push_str("\nHigh Request IPs:\n");
    push_counts(&mut out, &report.high_volume);

    out.push_str("\nBrute Force IPs:\n");
    push_counts(&mut out, &report.brute_force);

    out
}

fn push_counts(out: &mut String, result: &DetectionResult) {
    for entry in result {
        let _ = writeln!(out, "{}: {}", entry.address, entry.count);
    }
}
