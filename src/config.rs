use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::detection::{DEFAULT_FAILED_ATTEMPT_THRESHOLD, DEFAULT_VOLUME_THRESHOLD};

/// Errors that can occur while loading or saving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for an analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input configuration
    pub input: InputConfig,
    /// Detection thresholds
    pub detection: DetectionConfig,
    /// Output configuration
    pub output: OutputConfig,
}

/// Input configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Access log to analyze; prompted for when absent
    pub file_path: Option<PathBuf>,
}

/// Detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Requests an address must exceed to be reported as high volume
    pub volume_threshold: usize,
    /// Failed logins an address must exceed to be reported as brute force
    pub brute_force_threshold: usize,
    /// Sliding window for brute force counting in seconds (unset = whole log)
    pub brute_force_window_seconds: Option<u64>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            volume_threshold: DEFAULT_VOLUME_THRESHOLD,
            brute_force_threshold: DEFAULT_FAILED_ATTEMPT_THRESHOLD,
            brute_force_window_seconds: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "console", "json" or "jsonl"
    pub format: String,
    /// Output file path (stdout when absent)
    pub file_path: Option<PathBuf>,
    /// Save a PNG bar chart per non-empty result set
    pub charts: bool,
    /// Directory for chart files (current directory when absent)
    pub chart_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: "console".to_string(),
            file_path: None,
            charts: false,
            chart_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.input.file_path, None);
        assert_eq!(config.detection.volume_threshold, 100);
        assert_eq!(config.detection.brute_force_threshold, 5);
        assert_eq!(config.detection.brute_force_window_seconds, None);
        assert_eq!(config.output.format, "console");
        assert!(!config.output.charts);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [detection]
            volume_threshold = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.detection.volume_threshold, 250);
        assert_eq!(config.detection.brute_force_threshold, 5);
        assert_eq!(config.output.format, "console");
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heimdall.toml");

        let mut config = Config::default();
        config.input.file_path = Some(PathBuf::from("/var/log/nginx/access.log"));
        config.detection.brute_force_window_seconds = Some(300);
        config.output.format = "jsonl".to_string();
        config.output.charts = true;
        config.output.chart_dir = Some(PathBuf::from("/tmp/heimdall-charts"));

        config.to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_negative_window_rejected() {
        let parsed: Result<Config, _> = toml::from_str("[detection]\nbrute_force_window_seconds = -30\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[detection]\nvolume_threshold = \"many\"\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse(_))));
        assert!(matches!(
            Config::from_file(&dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
