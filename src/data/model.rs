use rustfft::num_complex::Complex;
use serde::Serialize;

use super::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// RawSample / Interferogram – what the instrument recorded
// ---------------------------------------------------------------------------

/// One row of an interferogram export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Mirror displacement in µm.
    pub position: f64,
    /// Detector voltage in mV.
    pub signal: f64,
}

/// Detector signal as a function of mirror displacement, in file row order.
///
/// The row order encodes the sweep direction and is never changed. Uniform
/// spacing of `positions` is assumed by the transform but not checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct Interferogram {
    positions: Vec<f64>,
    signals: Vec<f64>,
}

impl Interferogram {
    /// Pair up two columns. Both must have the same length.
    pub fn new(positions: Vec<f64>, signals: Vec<f64>) -> Result<Self> {
        if positions.len() != signals.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "{} positions but {} signal values",
                positions.len(),
                signals.len()
            )));
        }
        Ok(Self { positions, signals })
    }

    /// Columns that are equal in length by construction.
    pub(crate) fn from_parts(positions: Vec<f64>, signals: Vec<f64>) -> Self {
        debug_assert_eq!(positions.len(), signals.len());
        Self { positions, signals }
    }

    pub fn from_samples(samples: &[RawSample]) -> Self {
        Self {
            positions: samples.iter().map(|s| s.position).collect(),
            signals: samples.iter().map(|s| s.signal).collect(),
        }
    }

    /// Mirror displacements (µm).
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Detector voltages (mV).
    pub fn signals(&self) -> &[f64] {
        &self.signals
    }

    pub fn samples(&self) -> impl Iterator<Item = RawSample> + '_ {
        self.positions
            .iter()
            .zip(&self.signals)
            .map(|(&position, &signal)| RawSample { position, signal })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Spectrum – result of the Fourier transform
// ---------------------------------------------------------------------------

/// Fourier-domain view of one interferogram.
///
/// All three vectors share the FFT index ordering: index 0 is DC, then
/// positive frequencies up to Nyquist, then negative frequencies ending at
/// `-Δf` in the last slot. The three always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    frequencies: Vec<f64>,
    wavelengths: Vec<f64>,
    amplitudes: Vec<Complex<f64>>,
}

impl Spectrum {
    /// Assemble a spectrum from its three axes, which must be equal in length.
    pub fn new(
        frequencies: Vec<f64>,
        wavelengths: Vec<f64>,
        amplitudes: Vec<Complex<f64>>,
    ) -> Result<Self> {
        if frequencies.len() != wavelengths.len() || frequencies.len() != amplitudes.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "{} frequencies, {} wavelengths and {} amplitudes",
                frequencies.len(),
                wavelengths.len(),
                amplitudes.len()
            )));
        }
        Ok(Self {
            frequencies,
            wavelengths,
            amplitudes,
        })
    }

    /// Axes that are equal in length by construction.
    pub(crate) fn from_parts(
        frequencies: Vec<f64>,
        wavelengths: Vec<f64>,
        amplitudes: Vec<Complex<f64>>,
    ) -> Self {
        debug_assert!(frequencies.len() == wavelengths.len() && frequencies.len() == amplitudes.len());
        Self {
            frequencies,
            wavelengths,
            amplitudes,
        }
    }

    /// Spatial frequencies in cycles per µm.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// `1 / frequency - offset` in µm. Index 0 holds `f64::INFINITY`.
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    /// Raw (unnormalised) Fourier coefficients.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// `|amplitude|` for each bin, what gets plotted.
    pub fn magnitudes(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm()).collect()
    }

    /// Frequency bin spacing and the wavelength resolution it implies around
    /// `reference_wavelength_um`.
    ///
    /// `Δλ/λ = Δf/f` gives `Δλ = λ² Δf`; the result is converted to nm.
    /// Returns `None` for spectra shorter than two bins.
    pub fn resolution(&self, reference_wavelength_um: f64) -> Option<Resolution> {
        let delta_frequency = self.frequencies.get(1)? - self.frequencies.first()?;
        Some(Resolution {
            delta_frequency,
            delta_wavelength_nm: reference_wavelength_um
                * reference_wavelength_um
                * delta_frequency
                * 1000.0,
            reference_wavelength_um,
        })
    }

    /// Index, wavelength (nm) and magnitude of the strongest bin whose
    /// wavelength falls inside `[left_nm, right_nm]`.
    ///
    /// The DC sentinel and negative-frequency bins never qualify unless the
    /// window itself is negative.
    pub fn peak_in_window(&self, left_nm: f64, right_nm: f64) -> Option<Peak> {
        self.wavelengths
            .iter()
            .zip(&self.amplitudes)
            .enumerate()
            .filter_map(|(index, (&w, c))| {
                let wavelength_nm = w * 1000.0;
                (wavelength_nm.is_finite()
                    && wavelength_nm >= left_nm
                    && wavelength_nm <= right_nm)
                    .then(|| Peak {
                        index,
                        wavelength_nm,
                        magnitude: c.norm(),
                    })
            })
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
    }
}

/// Resolution implied by the sampling window. Recomputed on request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    /// Frequency bin spacing, cycles per µm.
    pub delta_frequency: f64,
    /// Wavelength resolution at the reference wavelength, nm.
    pub delta_wavelength_nm: f64,
    /// Wavelength the resolution was evaluated at, µm.
    pub reference_wavelength_um: f64,
}

/// A local maximum picked out of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    pub index: usize,
    pub wavelength_nm: f64,
    pub magnitude: f64,
}

// ---------------------------------------------------------------------------
// ReferenceSpectrum – commercial spectrometer export
// ---------------------------------------------------------------------------

/// Intensity vs. wavelength as exported by the bench spectrometer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSpectrum {
    /// Wavelength axis (nm).
    pub wavelengths_nm: Vec<f64>,
    /// Intensity – same length as `wavelengths_nm`.
    pub intensities: Vec<f64>,
}

impl ReferenceSpectrum {
    pub fn len(&self) -> usize {
        self.wavelengths_nm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths_nm.is_empty()
    }

    /// Strongest sample inside `[left_nm, right_nm]`.
    pub fn peak_in_window(&self, left_nm: f64, right_nm: f64) -> Option<Peak> {
        self.wavelengths_nm
            .iter()
            .zip(&self.intensities)
            .enumerate()
            .filter(|(_, (w, _))| **w >= left_nm && **w <= right_nm)
            .map(|(index, (&wavelength_nm, &magnitude))| Peak {
                index,
                wavelength_nm,
                magnitude,
            })
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(frequencies: Vec<f64>, magnitudes: &[f64]) -> Spectrum {
        let wavelengths = frequencies
            .iter()
            .map(|&f| if f == 0.0 { f64::INFINITY } else { 1.0 / f })
            .collect();
        Spectrum {
            frequencies,
            wavelengths,
            amplitudes: magnitudes.iter().map(|&m| Complex::new(m, 0.0)).collect(),
        }
    }

    #[test]
    fn spectrum_rejects_mismatched_axes() {
        let err = Spectrum::new(
            vec![0.0, 0.5],
            vec![f64::INFINITY, 2.0],
            vec![Complex::new(1.0, 0.0)],
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));

        let sp = Spectrum::new(
            vec![0.0, 0.5],
            vec![f64::INFINITY, 2.0],
            vec![Complex::new(1.0, 0.0), Complex::new(0.0, 1.0)],
        )
        .unwrap();
        assert_eq!(sp.len(), 2);
        assert_eq!(sp.wavelengths()[1], 2.0);
    }

    #[test]
    fn interferogram_rejects_mismatched_columns() {
        let err = Interferogram::new(vec![0.0, 1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn samples_follow_row_order() {
        let ifg = Interferogram::new(vec![3.0, 2.0, 1.0], vec![10.0, 20.0, 30.0]).unwrap();
        let samples: Vec<RawSample> = ifg.samples().collect();
        assert_eq!(samples[0], RawSample { position: 3.0, signal: 10.0 });
        assert_eq!(samples[2], RawSample { position: 1.0, signal: 30.0 });
        assert_eq!(Interferogram::from_samples(&samples), ifg);
    }

    #[test]
    fn resolution_at_half_micron() {
        let sp = spectrum(vec![0.0, 0.125, -0.25, -0.125], &[0.0, 1.0, 0.0, 1.0]);
        let res = sp.resolution(0.5).unwrap();
        assert_eq!(res.delta_frequency, 0.125);
        assert!((res.delta_wavelength_nm - 31.25).abs() < 1e-12);
    }

    #[test]
    fn resolution_needs_two_bins() {
        let sp = spectrum(vec![0.0], &[1.0]);
        assert!(sp.resolution(0.5).is_none());
    }

    #[test]
    fn peak_in_window_skips_dc_and_out_of_range_bins() {
        // wavelengths: inf, 2 µm, 1 µm, 0.5 µm
        let sp = spectrum(vec![0.0, 0.5, 1.0, 2.0], &[100.0, 50.0, 7.0, 9.0]);
        let peak = sp.peak_in_window(400.0, 1500.0).unwrap();
        assert_eq!(peak.index, 3);
        assert!((peak.wavelength_nm - 500.0).abs() < 1e-9);
        assert!(sp.peak_in_window(10.0, 20.0).is_none());
    }

    #[test]
    fn reference_peak_in_window() {
        let reference = ReferenceSpectrum {
            wavelengths_nm: vec![580.0, 589.0, 589.6, 700.0],
            intensities: vec![1.0, 40.0, 35.0, 90.0],
        };
        let peak = reference.peak_in_window(550.0, 650.0).unwrap();
        assert_eq!(peak.wavelength_nm, 589.0);
        assert_eq!(peak.magnitude, 40.0);
    }
}
