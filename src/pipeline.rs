use std::fmt;
use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;

use crate::config::{AnalysisJob, Settings};
use crate::data::error::AnalysisError;
use crate::data::loader::load_interferogram;
use crate::data::model::{Interferogram, Peak, Resolution, Spectrum};
use crate::report::SpectrumSink;
use crate::spectral::transform;

// ---------------------------------------------------------------------------
// Per-job results
// ---------------------------------------------------------------------------

/// Which step of the pipeline a job failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Load,
    Transform,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => write!(f, "load"),
            Stage::Transform => write!(f, "transform"),
        }
    }
}

/// A job that could not be analysed.
#[derive(Debug, thiserror::Error)]
#[error("{} ({stage}): {error}", .file.display())]
pub struct JobFailure {
    pub file: PathBuf,
    pub stage: Stage,
    #[source]
    pub error: AnalysisError,
}

/// Everything the reporting side needs to draw one measurement.
#[derive(Debug, Clone)]
pub struct SpectrumReport {
    pub job: AnalysisJob,
    /// Resolved path the interferogram was read from.
    pub path: PathBuf,
    pub interferogram: Interferogram,
    pub spectrum: Spectrum,
    pub resolution: Resolution,
}

impl SpectrumReport {
    /// `"<title>, resolution <Δλ> nm"`, two decimals.
    pub fn label(&self) -> String {
        format!(
            "{}, resolution {:.2} nm",
            self.job.title, self.resolution.delta_wavelength_nm
        )
    }

    /// Strongest spectral bin inside the job's display window.
    pub fn peak_in_window(&self) -> Option<Peak> {
        self.spectrum.peak_in_window(self.job.left_nm, self.job.right_nm)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Load → transform → resolution for a list of jobs.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub settings: Settings,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Analyse one job. Errors carry the file and the failing stage.
    pub fn analyze(&self, job: &AnalysisJob) -> Result<SpectrumReport, JobFailure> {
        let path = self.settings.resolve(&job.file);
        let fail = |stage, error| JobFailure {
            file: path.clone(),
            stage,
            error,
        };

        let interferogram =
            load_interferogram(&path, &self.settings.layout).map_err(|e| fail(Stage::Load, e))?;
        let spectrum = transform(&interferogram, self.settings.wavelength_offset_um)
            .map_err(|e| fail(Stage::Transform, e))?;
        let resolution = spectrum
            .resolution(self.settings.reference_wavelength_um)
            .ok_or_else(|| {
                fail(
                    Stage::Transform,
                    AnalysisError::InvalidInput("spectrum has fewer than 2 bins".into()),
                )
            })?;

        info!(
            "{}: {} samples, Δf = {:.6} µm⁻¹, Δλ = {:.2} nm at {} µm",
            path.display(),
            interferogram.len(),
            resolution.delta_frequency,
            resolution.delta_wavelength_nm,
            resolution.reference_wavelength_um
        );

        Ok(SpectrumReport {
            job: job.clone(),
            path,
            interferogram,
            spectrum,
            resolution,
        })
    }

    /// Run every job in order, handing each successful report to `sink`.
    ///
    /// A failing job is logged and recorded; it never stops the batch.
    pub fn run(&self, jobs: &[AnalysisJob], sink: &mut dyn SpectrumSink) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for job in jobs {
            match self.analyze(job) {
                Ok(report) => {
                    sink.render(&report);
                    summary.succeeded.push(JobSummary::from(&report));
                }
                Err(failure) => {
                    warn!("skipping {failure}");
                    summary.failed.push(FailureSummary::from(&failure));
                }
            }
        }
        summary
    }
}

// ---------------------------------------------------------------------------
// Batch summary
// ---------------------------------------------------------------------------

/// What happened to each job of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub succeeded: Vec<JobSummary>,
    pub failed: Vec<FailureSummary>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub file: PathBuf,
    pub title: String,
    pub samples: usize,
    #[serde(flatten)]
    pub resolution: Resolution,
    pub peak: Option<Peak>,
}

impl From<&SpectrumReport> for JobSummary {
    fn from(report: &SpectrumReport) -> Self {
        Self {
            file: report.path.clone(),
            title: report.label(),
            samples: report.interferogram.len(),
            resolution: report.resolution,
            peak: report.peak_in_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureSummary {
    pub file: PathBuf,
    pub stage: Stage,
    pub message: String,
}

impl From<&JobFailure> for FailureSummary {
    fn from(failure: &JobFailure) -> Self {
        Self {
            file: failure.file.clone(),
            stage: failure.stage,
            message: failure.error.to_string(),
        }
    }
}
