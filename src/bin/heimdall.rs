use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

use heimdall::config::Config;
use heimdall::input::AccessLogParser;
use heimdall::output::{ChartWriter, OutputFormat, OutputHandler};
use heimdall::{AnalysisError, Analyzer};

/// Access log analyzer
#[derive(StructOpt, Debug)]
#[structopt(name = "heimdall", about = "Flag failed logins, high-volume clients and brute force attempts in access logs")]
pub enum Cli {
    /// Analyze an access log
    Analyze {
        /// Path to the access log (prompted for when not given)
        #[structopt(short, long)]
        file: Option<PathBuf>,
        /// Path to configuration file
        #[structopt(short, long)]
        config: Option<PathBuf>,
        /// Output format: console, json or jsonl
        #[structopt(long)]
        format: Option<String>,
        /// Write the report to this file instead of stdout
        #[structopt(short, long)]
        output: Option<PathBuf>,
        /// Requests an address must exceed to be reported
        #[structopt(long)]
        volume_threshold: Option<usize>,
        /// Failed logins an address must exceed to be reported as brute force
        #[structopt(long)]
        brute_force_threshold: Option<usize>,
        /// Only count failed logins inside a sliding window of this many seconds
        #[structopt(long)]
        window_seconds: Option<u64>,
        /// Save a bar chart per non-empty result set
        #[structopt(long)]
        charts: bool,
        /// Directory for chart files
        #[structopt(long)]
        chart_dir: Option<PathBuf>,
    },
    /// Parse and display records from an access log
    Parse {
        /// Path to log file
        #[structopt(short, long)]
        file: PathBuf,
        /// Number of records to show
        #[structopt(short, long, default_value = "10")]
        lines: usize,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "heimdall.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match Cli::from_args() {
        Cli::Analyze {
            file,
            config,
            format,
            output,
            volume_threshold,
            brute_force_threshold,
            window_seconds,
            charts,
            chart_dir,
        } => {
            let mut config = match config {
                Some(path) => Config::from_file(&path)?,
                None => Config::default(),
            };

            // Command line flags win over the configuration file
            if let Some(file) = file {
                config.input.file_path = Some(file);
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            if let Some(output) = output {
                config.output.file_path = Some(output);
            }
            if let Some(threshold) = volume_threshold {
                config.detection.volume_threshold = threshold;
            }
            if let Some(threshold) = brute_force_threshold {
                config.detection.brute_force_threshold = threshold;
            }
            if let Some(window) = window_seconds {
                config.detection.brute_force_window_seconds = Some(window);
            }
            if charts {
                config.output.charts = true;
            }
            if let Some(dir) = chart_dir {
                config.output.chart_dir = Some(dir);
            }

            let log_file = match config.input.file_path.clone() {
                Some(path) => path,
                None => prompt_for_path()?,
            };

            run_analysis(&config, &log_file)?;
        }
        Cli::Parse { file, lines } => {
            let parser = AccessLogParser::new(file);
            if !parser.is_valid() {
                eprintln!("File not found: {}", parser.file_path().display());
                std::process::exit(1);
            }

            let store = parser.load();
            let display_count = std::cmp::min(lines, store.len());

            println!("Parsed {} record(s) (showing {}):\n", store.len(), display_count);
            for record in store.iter().take(display_count) {
                println!(
                    "  IP: {}, Time: {}, Request: \"{}\", Status: {}, Size: {}",
                    record.source_address,
                    record.timestamp,
                    record.request_line,
                    record.status_code,
                    record
                        .response_size
                        .map_or_else(|| "-".to_string(), |size| size.to_string())
                );
            }
        }
        Cli::Config { output } => {
            let config = Config::default();
            config.to_file(&output)?;
            println!("Default configuration written to: {}", output.display());
        }
    }

    Ok(())
}

fn run_analysis(config: &Config, log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = Analyzer::with_config(&config.detection);

    let report = match analyzer.run(log_file) {
        Ok(report) => report,
        Err(AnalysisError::Input(e)) => {
            eprintln!("{}", e);
            eprintln!("No valid log entries found. Exiting.");
            std::process::exit(1);
        }
        Err(AnalysisError::EmptyLog(_)) => {
            eprintln!("No valid log entries found. Exiting.");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let mut output_handler = OutputHandler::new(
        OutputFormat::from_name(&config.output.format),
        config.output.file_path.clone(),
    )?;
    output_handler.write_report(&report)?;
    output_handler.flush()?;

    if config.output.charts {
        let dir = config
            .output
            .chart_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        ChartWriter::new(dir).write_charts(&report)?;
    }

    Ok(())
}

fn prompt_for_path() -> io::Result<PathBuf> {
    print!("Enter the log file path: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}
