//! # michelson-fft
//!
//! Batch analysis of Michelson interferometer scans.
//!
//! ```bash
//! # Analyse the built-in list of lab measurements found in ./files
//! michelson-fft run
//!
//! # Own job list and settings, JSON summary on stdout
//! michelson-fft run --manifest jobs.csv --config michelson.toml --json
//!
//! # Strongest line of a reference spectrometer export
//! michelson-fft reference files/oceanHG.txt 200 700
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use michelson_fft::config::{check_window, default_jobs, load_manifest, ConfigFile, Settings};
use michelson_fft::data::loader::{load_reference, TableLayout};
use michelson_fft::pipeline::Pipeline;
use michelson_fft::report::{summary_table, LogSink};

/// Fourier analysis of Michelson interferograms
#[derive(Parser)]
#[command(name = "michelson-fft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform every interferogram of a job list and report resolutions
    Run {
        /// TOML settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// CSV job list (file,left_nm,right_nm,title); built-in list if omitted
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Directory holding the exports (overrides the config file)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Print the summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Report the strongest line of a reference spectrometer export
    Reference {
        /// Two-column export: wavelength (nm), intensity
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Lower wavelength limit (nm)
        left: f64,

        /// Upper wavelength limit (nm)
        right: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Run {
            config,
            manifest,
            data_dir,
            json,
        } => {
            let file = match &config {
                Some(path) => ConfigFile::from_file(path)?,
                None => ConfigFile::default(),
            };
            let mut settings = Settings::from_config(&file)?;
            if let Some(dir) = data_dir {
                settings.data_dir = dir;
            }

            let jobs = match &manifest {
                Some(path) => load_manifest(path)?,
                None => default_jobs(),
            };
            info!(
                "{} jobs, data in {}",
                jobs.len(),
                settings.data_dir.display()
            );

            let summary = Pipeline::new(settings).run(&jobs, &mut LogSink);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary).context("serializing summary")?
                );
            } else {
                print!("{}", summary_table(&summary));
            }

            if !summary.all_succeeded() {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Reference { file, left, right } => {
            check_window(left, right)?;
            let reference = load_reference(&file, &TableLayout::REFERENCE)
                .with_context(|| format!("loading {}", file.display()))?;
            match reference.peak_in_window(left, right) {
                Some(peak) => println!(
                    "{}: peak at {:.2} nm (intensity {})",
                    file.display(),
                    peak.wavelength_nm,
                    peak.magnitude
                ),
                None => println!("{}: no samples in [{left}, {right}] nm", file.display()),
            }
            Ok(())
        }
    }
}
