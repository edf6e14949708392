//! Bar chart rendering for analysis reports
//!
//! One PNG per non-empty result set, written under fixed file names.

use plotters::prelude::*;
use std::path::{Path, PathBuf};

use crate::models::{AnalysisReport, DetectionResult};
use crate::output::OutputError;

pub const FAILED_LOGINS_CHART: &str = "failed_logins.png";
pub const HIGH_VOLUME_CHART: &str = "high_request_ips.png";
pub const BRUTE_FORCE_CHART: &str = "brute_force_ips.png";

const CHART_SIZE: (u32, u32) = (1000, 600);
const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// Writes bar charts for a report into a directory
pub struct ChartWriter {
    output_dir: PathBuf,
}

impl ChartWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        ChartWriter { output_dir }
    }

    /// Draw a chart for every non-empty result set.
    ///
    /// Returns the paths of the files written.
    pub fn write_charts(&self, report: &AnalysisReport) -> Result<Vec<PathBuf>, OutputError> {
        let charts = [
            (
                FAILED_LOGINS_CHART,
                "Failed Login Attempts by IP",
                "Failed Attempts",
                &report.failed_logins,
                RED,
            ),
            (
                HIGH_VOLUME_CHART,
                "High Request IPs",
                "Request Count",
                &report.high_volume,
                BLUE,
            ),
            (
                BRUTE_FORCE_CHART,
                "Brute Force IPs",
                "Failed Login Count",
                &report.brute_force,
                ORANGE,
            ),
        ];

        let mut written = Vec::new();
        for (file_name, title, y_desc, result, color) in charts {
            if result.is_empty() {
                continue;
            }
            let path = self.output_dir.join(file_name);
            draw_bar_chart(&path, title, y_desc, result, color)?;
            log::info!("Chart saved to {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

fn draw_bar_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    result: &DetectionResult,
    color: RGBColor,
) -> Result<(), OutputError> {
    let addresses = result.addresses();
    let max_count = result.iter().map(|e| e.count as u64).max().unwrap_or(0);
    let bar_count = u32::try_from(addresses.len()).unwrap_or(u32::MAX);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..bar_count).into_segmented(), 0u64..max_count + max_count / 10 + 1)
        .map_err(chart_error)?;

    let label_of = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(idx) => addresses
            .get(*idx as usize)
            .map(|a| a.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("IP Address")
        .y_desc(y_desc)
        .x_label_formatter(&label_of)
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(10)
                .data(
                    result
                        .iter()
                        .enumerate()
                        .map(|(idx, e)| (idx as u32, e.count as u64)),
                ),
        )
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

fn chart_error<E: std::fmt::Display>(e: E) -> OutputError {
    OutputError::Chart(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AddressCount;

    fn create_result(pairs: &[(&str, usize)]) -> DetectionResult {
        DetectionResult::from_entries(
            pairs
                .iter()
                .map(|(address, count)| AddressCount {
                    address: address.to_string(),
                    count: *count,
                })
                .collect(),
        )
    }

    #[test]
    fn test_charts_only_for_non_empty_sets() {
        let dir = tempfile::tempdir().unwrap();
        let report = AnalysisReport {
            source: "access.log".to_string(),
            total_records: 12,
            failed_logins: create_result(&[("192.168.1.2", 8), ("192.168.1.9", 1)]),
            high_volume: DetectionResult::default(),
            brute_force: create_result(&[("192.168.1.2", 8)]),
        };

        let written = ChartWriter::new(dir.path().to_path_buf())
            .write_charts(&report)
            .unwrap();

        assert_eq!(
            written,
            vec![
                dir.path().join(FAILED_LOGINS_CHART),
                dir.path().join(BRUTE_FORCE_CHART)
            ]
        );
        assert!(!dir.path().join(HIGH_VOLUME_CHART).exists());

        let bytes = std::fs::read(dir.path().join(FAILED_LOGINS_CHART)).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_no_charts_for_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = AnalysisReport {
            source: "quiet.log".to_string(),
            total_records: 3,
            failed_logins: DetectionResult::default(),
            high_volume: DetectionResult::default(),
            brute_force: DetectionResult::default(),
        };

        let written = ChartWriter::new(dir.path().to_path_buf())
            .write_charts(&report)
            .unwrap();

        assert!(written.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
