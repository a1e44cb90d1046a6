//! Fourier analysis of Michelson interferograms.
//!
//! An interferogram (detector voltage vs. mirror displacement) is loaded from
//! the acquisition software's text export, Fourier transformed with the
//! factor-of-two optical path correction, and turned into frequency and
//! wavelength axes plus the resolution implied by the scan length.
//!
//! ```no_run
//! use michelson_fft::config::{default_jobs, Settings};
//! use michelson_fft::pipeline::Pipeline;
//! use michelson_fft::report::LogSink;
//!
//! let pipeline = Pipeline::new(Settings::default());
//! let summary = pipeline.run(&default_jobs(), &mut LogSink);
//! assert!(summary.all_succeeded());
//! ```

pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod spectral;

pub use data::error::AnalysisError;
pub use data::model::{Interferogram, RawSample, Resolution, Spectrum};
pub use spectral::transform;
