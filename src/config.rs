//! Run configuration: calibration constants, input layout and the job list.
//!
//! Settings come from an optional TOML file:
//!
//! ```toml
//! # michelson.toml
//! [input]
//! data_dir = "files"
//! header_lines = 18
//! footer_lines = 1
//!
//! [calibration]
//! wavelength_offset_um = 2e-7
//! reference_wavelength_um = 0.5
//! ```
//!
//! Jobs come from an optional CSV manifest with the header
//! `file,left_nm,right_nm,title`; without one the lab session's built-in
//! list is used.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::data::loader::{TableLayout, DEFAULT_FOOTER_LINES, DEFAULT_HEADER_LINES};
use crate::spectral::WAVELENGTH_OFFSET_UM;

/// Wavelength at which resolution is quoted when nothing else is known
/// about the source (middle of the visible range).
pub const DEFAULT_REFERENCE_WAVELENGTH_UM: f64 = 0.5;

/// Directory the lab exports live in, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "files";

// ---------------------------------------------------------------------------
// TOML file
// ---------------------------------------------------------------------------

/// Root of `michelson.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Base directory for relative job paths.
    pub data_dir: Option<PathBuf>,
    pub header_lines: Option<usize>,
    pub footer_lines: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationConfig {
    /// Subtracted from every `1 / f`, in µm.
    pub wavelength_offset_um: Option<f64>,
    /// Where the wavelength resolution is evaluated, in µm.
    pub reference_wavelength_um: Option<f64>,
}

impl ConfigFile {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

// ---------------------------------------------------------------------------
// Resolved settings
// ---------------------------------------------------------------------------

/// Fully resolved settings the pipeline runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub layout: TableLayout,
    pub wavelength_offset_um: f64,
    pub reference_wavelength_um: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            layout: TableLayout::INTERFEROGRAM,
            wavelength_offset_um: WAVELENGTH_OFFSET_UM,
            reference_wavelength_um: DEFAULT_REFERENCE_WAVELENGTH_UM,
        }
    }
}

impl Settings {
    /// Overlay the keys present in `file` on the defaults.
    pub fn from_config(file: &ConfigFile) -> Result<Self> {
        let defaults = Settings::default();
        let reference_wavelength_um = file
            .calibration
            .reference_wavelength_um
            .unwrap_or(defaults.reference_wavelength_um);
        if !(reference_wavelength_um.is_finite() && reference_wavelength_um > 0.0) {
            bail!("reference_wavelength_um must be positive, got {reference_wavelength_um}");
        }
        let wavelength_offset_um = file
            .calibration
            .wavelength_offset_um
            .unwrap_or(defaults.wavelength_offset_um);
        if !wavelength_offset_um.is_finite() {
            bail!("wavelength_offset_um must be finite, got {wavelength_offset_um}");
        }

        Ok(Self {
            data_dir: file.input.data_dir.clone().unwrap_or(defaults.data_dir),
            layout: defaults.layout.with_margins(
                file.input.header_lines.unwrap_or(DEFAULT_HEADER_LINES),
                file.input.footer_lines.unwrap_or(DEFAULT_FOOTER_LINES),
            ),
            wavelength_offset_um,
            reference_wavelength_um,
        })
    }

    /// Job paths are taken relative to `data_dir` unless already absolute.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// One interferogram to analyse, with the wavelength window (nm) its
/// spectrum is shown in and the title it is labelled with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisJob {
    pub file: PathBuf,
    pub left_nm: f64,
    pub right_nm: f64,
    pub title: String,
}

impl AnalysisJob {
    pub fn new(file: impl Into<PathBuf>, left_nm: f64, right_nm: f64, title: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            left_nm,
            right_nm,
            title: title.into(),
        }
    }
}

/// The measurements kept from the lab session, in presentation order.
pub fn default_jobs() -> Vec<AnalysisJob> {
    vec![
        AnalysisJob::new("laser_he_ne_3.txt", 300.0, 800.0, "Laser He-Ne"),
        AnalysisJob::new("lum_blanche_6.txt", 0.0, 1300.0, "Lumière blanche"),
        AnalysisJob::new("lum_sodium_1.txt", 3900.0, 10000.0, "Lumière sodium longue mesure"),
        AnalysisJob::new("lum_sodium_2.txt", 200.0, 1000.0, "Lumière sodium courte mesure"),
        AnalysisJob::new("lum_mercure_2.txt", 100.0, 800.0, "Lumière mercure"),
        AnalysisJob::new("autre_jaune.txt", 100.0, 800.0, "Lumière jaune"),
    ]
}

/// A plotting window must have its left limit strictly below its right one.
pub fn check_window(left_nm: f64, right_nm: f64) -> Result<()> {
    if !(left_nm < right_nm) {
        bail!("left limit {left_nm} is not below right limit {right_nm}");
    }
    Ok(())
}

/// Read a job manifest (`file,left_nm,right_nm,title`), keeping row order.
pub fn load_manifest(path: &Path) -> Result<Vec<AnalysisJob>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening manifest {}", path.display()))?;
    read_manifest(reader)
}

pub fn read_manifest<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<AnalysisJob>> {
    let mut jobs = Vec::new();
    for (row_no, result) in reader.deserialize().enumerate() {
        let job: AnalysisJob = result.with_context(|| format!("manifest row {}", row_no + 1))?;
        check_window(job.left_nm, job.right_nm)
            .with_context(|| format!("manifest row {}", row_no + 1))?;
        jobs.push(job);
    }
    Ok(jobs)
}
