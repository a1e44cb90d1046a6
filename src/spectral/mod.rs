//! Fourier analysis of interferograms.
//!
//! [`transform`] turns an [`Interferogram`](crate::data::model::Interferogram)
//! into a [`Spectrum`](crate::data::model::Spectrum); [`synth`] produces
//! synthetic interferograms of known sources for checking the pipeline.

pub mod synth;
pub mod transform;

pub use transform::{transform, WAVELENGTH_OFFSET_UM};
