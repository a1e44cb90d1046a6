//! Write a synthetic interferogram in the acquisition software's export
//! format, for trying the pipeline without bench data.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use michelson_fft::spectral::synth::{self, SimpleRng};
use michelson_fft::Interferogram;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Source {
    /// Single line at 632.8 nm
    HeNe,
    /// Visible band 400 – 800 nm
    White,
}

/// Generate a synthetic Michelson scan
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Light source to simulate
    #[arg(short, long, value_enum, default_value = "he-ne")]
    source: Source,

    /// First mirror position (µm)
    #[arg(long, default_value = "-100", allow_hyphen_values = true)]
    x_min: f64,

    /// Last mirror position (µm)
    #[arg(long, default_value = "100", allow_hyphen_values = true)]
    x_max: f64,

    /// Number of samples
    #[arg(short, long, default_value = "4000")]
    n: usize,

    /// Noise seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Output file
    #[arg(value_name = "OUTPUT", default_value = "synthetic_interferogram.txt")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.n < 2 {
        bail!("need at least 2 samples, got {}", args.n);
    }
    if args.x_min >= args.x_max {
        bail!("x-min ({}) must be below x-max ({})", args.x_min, args.x_max);
    }

    let mut rng = SimpleRng::new(args.seed);
    let (interferogram, title): (Interferogram, &str) = match args.source {
        Source::HeNe => (synth::he_ne(args.x_min, args.x_max, args.n, &mut rng), "He-Ne laser"),
        Source::White => (
            synth::white_light(args.x_min, args.x_max, args.n, &mut rng),
            "white light",
        ),
    };

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    synth::write_instrument_file(&interferogram, title, BufWriter::new(file))
        .with_context(|| format!("writing {}", args.output.display()))?;

    log::info!("wrote {} samples of {title}", interferogram.len());
    println!(
        "Wrote {} samples ({title}, {} to {} µm) to {}",
        interferogram.len(),
        args.x_min,
        args.x_max,
        args.output.display()
    );
    Ok(())
}
