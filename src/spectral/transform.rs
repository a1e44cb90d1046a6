use log::debug;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::data::error::{AnalysisError, Result};
use crate::data::model::{Interferogram, Spectrum};

/// Calibration offset subtracted from every wavelength, in µm.
///
/// Carried over unchanged from the reference setup so that spectra of
/// different sources remain comparable.
pub const WAVELENGTH_OFFSET_UM: f64 = 200e-9;

/// Moving the scanning mirror by δ changes the optical path by 2δ.
pub const OPTICAL_PATH_FACTOR: f64 = 2.0;

/// Fourier transform an interferogram into frequency and wavelength axes.
///
/// The sampling interval is `dx = 2 * (x[1] - x[0])`; only the first pair of
/// positions is looked at, the rest are assumed equidistant. The returned
/// spectrum is in FFT order: DC at index 0, ascending positive frequencies up
/// to `1 / (2 dx)`, then negative frequencies up to `-1 / (N dx)` in the last
/// slot.
///
/// `wavelengths[i] = 1 / frequencies[i] - offset_um`. The DC bin has no
/// wavelength and is set to `f64::INFINITY`.
///
/// The result is a pure function of the input: calling this twice on the
/// same interferogram gives bit-identical spectra.
pub fn transform(interferogram: &Interferogram, offset_um: f64) -> Result<Spectrum> {
    let n = interferogram.len();
    if n < 2 {
        return Err(AnalysisError::InvalidInput(format!(
            "{n} samples, need at least 2 to derive the sampling interval"
        )));
    }

    let positions = interferogram.positions();
    let dx = OPTICAL_PATH_FACTOR * (positions[1] - positions[0]);
    if dx == 0.0 || !dx.is_finite() {
        return Err(AnalysisError::InvalidInput(format!(
            "sampling interval is {dx} (positions {} and {})",
            positions[0], positions[1]
        )));
    }
    debug!("transforming {n} samples, dx = {dx} µm");

    let amplitudes = forward_fft(interferogram.signals());
    let frequencies = fft_frequencies(n, dx);
    let wavelengths = frequencies
        .iter()
        .enumerate()
        .map(|(i, &f)| {
            if i == 0 {
                f64::INFINITY
            } else {
                1.0 / f - offset_um
            }
        })
        .collect();

    Ok(Spectrum::from_parts(frequencies, wavelengths, amplitudes))
}

/// Unnormalised forward DFT of a real sequence.
fn forward_fft(signal: &[f64]) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&v| Complex::new(v, 0.0)).collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);

    buffer
}

/// Sample frequencies of an `n`-point FFT with spacing `d`.
///
/// `[0, 1, ..., ceil(n/2) - 1, -floor(n/2), ..., -1] / (n d)`
pub fn fft_frequencies(n: usize, d: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * d);
    let positive = n.div_ceil(2);
    (0..n)
        .map(|i| {
            let k = if i < positive {
                i as f64
            } else {
                i as f64 - n as f64
            };
            k * scale
        })
        .collect()
}
