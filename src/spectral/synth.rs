use std::f64::consts::PI;
use std::io::{self, Write};

use crate::data::loader::{DEFAULT_FOOTER_LINES, DEFAULT_HEADER_LINES};
use crate::data::model::Interferogram;
use crate::spectral::transform::OPTICAL_PATH_FACTOR;

/// He-Ne laser line in µm.
pub const HE_NE_WAVELENGTH_UM: f64 = 0.6328;

/// Uniform noise amplitude added to synthetic signals.
const NOISE_AMPLITUDE: f64 = 0.05;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// `n` evenly spaced points from `x_min` to `x_max`, both ends included.
pub fn linspace(x_min: f64, x_max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![x_min],
        _ => {
            let step = (x_max - x_min) / (n - 1) as f64;
            (0..n).map(|i| x_min + i as f64 * step).collect()
        }
    }
}

/// Fringes of a single He-Ne line plus a little uniform noise.
///
/// `x_min` and `x_max` are mirror positions in µm; the fringes follow the
/// optical path difference, twice the mirror travel.
pub fn he_ne(x_min: f64, x_max: f64, n: usize, rng: &mut SimpleRng) -> Interferogram {
    let positions = linspace(x_min, x_max, n);
    let signals = positions
        .iter()
        .map(|&x| {
            let opd = OPTICAL_PATH_FACTOR * x;
            1.0 + (2.0 * PI / HE_NE_WAVELENGTH_UM * opd).cos() + rng.next_f64() * NOISE_AMPLITUDE
        })
        .collect();
    Interferogram::from_parts(positions, signals)
}

/// Band-limited visible source (0.4 – 0.8 µm) under a Gaussian envelope,
/// sampled at mirror positions like [`he_ne`].
pub fn white_light(x_min: f64, x_max: f64, n: usize, rng: &mut SimpleRng) -> Interferogram {
    let k1 = 1.0 / 0.4;
    let k2 = 1.0 / 0.8;
    let carrier = PI * (k1 + k2);
    let beat = PI * (k1 - k2);

    let positions = linspace(x_min, x_max, n);
    let signals = positions
        .iter()
        .map(|&x| {
            let opd = OPTICAL_PATH_FACTOR * x;
            let noise = rng.next_f64() * NOISE_AMPLITUDE;
            // sin(a x) / x → a at the origin, and sin(b x) → 0
            let fringes = if opd == 0.0 {
                0.0
            } else {
                (carrier * opd).sin() / opd * (beat * opd).sin()
            };
            1.0 + (-opd * opd / 4.0).exp() * (fringes + noise)
        })
        .collect();
    Interferogram::from_parts(positions, signals)
}

// ---------------------------------------------------------------------------
// Instrument-format writer
// ---------------------------------------------------------------------------

/// Write `interferogram` the way the acquisition software exports it, so
/// that it loads back with `TableLayout::INTERFEROGRAM`.
pub fn write_instrument_file<W: Write>(
    interferogram: &Interferogram,
    title: &str,
    mut out: W,
) -> io::Result<()> {
    writeln!(out, "# {title}")?;
    writeln!(out, "# samples: {}", interferogram.len())?;
    for i in 2..DEFAULT_HEADER_LINES - 1 {
        writeln!(out, "# reserved {i}")?;
    }
    writeln!(out, "index\tposition_um\tsignal_mV")?;

    for (i, sample) in interferogram.samples().enumerate() {
        writeln!(out, "{i}\t{}\t{:.6}", sample.position, sample.signal)?;
    }

    for _ in 0..DEFAULT_FOOTER_LINES {
        writeln!(out, "# end")?;
    }
    out.flush()
}

// ---------------------------------------------------------------------------
// Deterministic PRNG
// ---------------------------------------------------------------------------

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
