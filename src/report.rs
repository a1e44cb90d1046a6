use std::fmt::Write as _;

use log::info;

use crate::pipeline::{BatchSummary, SpectrumReport};

// ---------------------------------------------------------------------------
// Reporting seam
// ---------------------------------------------------------------------------

/// Consumer of analysed spectra: a plotter, a logger, a test probe.
///
/// The pipeline calls `render` once per successful job, in job order.
pub trait SpectrumSink {
    fn render(&mut self, report: &SpectrumReport);
}

/// Logs one line per spectrum at `info` level.
#[derive(Debug, Default)]
pub struct LogSink;

impl SpectrumSink for LogSink {
    fn render(&mut self, report: &SpectrumReport) {
        match report.peak_in_window() {
            Some(peak) => info!(
                "{} | peak {:.1} nm (|A| = {:.3e}) in [{}, {}] nm",
                report.label(),
                peak.wavelength_nm,
                peak.magnitude,
                report.job.left_nm,
                report.job.right_nm
            ),
            None => info!(
                "{} | no bins in [{}, {}] nm",
                report.label(),
                report.job.left_nm,
                report.job.right_nm
            ),
        }
    }
}

/// Keeps the labels it was shown.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub labels: Vec<String>,
}

impl SpectrumSink for CollectSink {
    fn render(&mut self, report: &SpectrumReport) {
        self.labels.push(report.label());
    }
}

// ---------------------------------------------------------------------------
// Text summary
// ---------------------------------------------------------------------------

/// Plain-text table of a batch run, successes first.
pub fn summary_table(summary: &BatchSummary) -> String {
    let mut out = String::new();

    for job in &summary.succeeded {
        let peak = job
            .peak
            .map(|p| format!("{:.1} nm", p.wavelength_nm))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "ok      {:<40} N={:<7} Δf={:<10.6} peak {}",
            job.title, job.samples, job.resolution.delta_frequency, peak
        );
    }
    for failure in &summary.failed {
        let _ = writeln!(
            out,
            "FAILED  {} [{}] {}",
            failure.file.display(),
            failure.stage,
            failure.message
        );
    }

    let _ = writeln!(
        out,
        "{} analysed, {} failed",
        summary.succeeded.len(),
        summary.failed.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Resolution;
    use crate::pipeline::{FailureSummary, JobSummary, Stage};
    use std::path::PathBuf;

    #[test]
    fn table_lists_failures_after_successes() {
        let summary = BatchSummary {
            succeeded: vec![JobSummary {
                file: PathBuf::from("files/laser_he_ne_3.txt"),
                title: "Laser He-Ne, resolution 0.52 nm".into(),
                samples: 4096,
                resolution: Resolution {
                    delta_frequency: 0.002,
                    delta_wavelength_nm: 0.5,
                    reference_wavelength_um: 0.5,
                },
                peak: None,
            }],
            failed: vec![FailureSummary {
                file: PathBuf::from("files/autre_jaune.txt"),
                stage: Stage::Load,
                message: "file not found: files/autre_jaune.txt".into(),
            }],
        };

        let table = summary_table(&summary);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ok"));
        assert!(lines[0].contains("N=4096"));
        assert!(lines[1].starts_with("FAILED  files/autre_jaune.txt [load]"));
        assert_eq!(lines[2], "1 analysed, 1 failed");
    }
}
