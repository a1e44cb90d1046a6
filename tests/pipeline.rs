//! End-to-end runs over files written to a temporary data directory.

use std::f64::consts::PI;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use michelson_fft::config::{load_manifest, AnalysisJob, Settings};
use michelson_fft::data::loader::{load_interferogram, load_reference, TableLayout};
use michelson_fft::pipeline::{Pipeline, Stage};
use michelson_fft::report::CollectSink;
use michelson_fft::spectral::synth::{self, SimpleRng};
use michelson_fft::{transform, AnalysisError, Interferogram};
use tempfile::tempdir;

/// Mirror scan of a single line at `wavelength_um`, `n` steps of `step` µm.
fn write_line_scan(path: &Path, wavelength_um: f64, step: f64, n: usize) {
    let positions: Vec<f64> = (0..n).map(|i| i as f64 * step).collect();
    // Optical path is twice the mirror travel.
    let signals = positions
        .iter()
        .map(|&x| 1.0 + (2.0 * PI * 2.0 * x / wavelength_um).cos())
        .collect();
    let ifg = Interferogram::new(positions, signals).unwrap();
    let file = BufWriter::new(File::create(path).unwrap());
    synth::write_instrument_file(&ifg, "line scan", file).unwrap();
}

#[test]
fn he_ne_scan_is_found_at_its_wavelength() {
    let dir = tempdir().unwrap();
    write_line_scan(&dir.path().join("laser.txt"), 0.6328, 0.02, 4000);

    let pipeline = Pipeline::new(Settings {
        data_dir: dir.path().to_path_buf(),
        reference_wavelength_um: 0.6328,
        ..Settings::default()
    });
    let report = pipeline
        .analyze(&AnalysisJob::new("laser.txt", 300.0, 800.0, "Laser He-Ne"))
        .unwrap();

    assert_eq!(report.interferogram.len(), 4000);
    // dx = 0.04 µm → Δf = 1 / (4000 · 0.04)
    assert!((report.resolution.delta_frequency - 1.0 / 160.0).abs() < 1e-9);
    let peak = report.peak_in_window().unwrap();
    assert!(
        (peak.wavelength_nm - 632.8).abs() < report.resolution.delta_wavelength_nm,
        "peak at {} nm",
        peak.wavelength_nm
    );
    assert!(report.label().starts_with("Laser He-Ne, resolution "));
}

#[test]
fn batch_reports_failures_and_renders_the_rest() {
    let dir = tempdir().unwrap();
    write_line_scan(&dir.path().join("sodium.txt"), 0.589, 0.05, 1000);
    fs::write(dir.path().join("short.txt"), "only\nten\nlines\n\n\n\n\n\n\n\n").unwrap();

    let manifest = dir.path().join("jobs.csv");
    fs::write(
        &manifest,
        "file,left_nm,right_nm,title\n\
         short.txt,100,800,Truncated\n\
         missing.txt,100,800,Missing\n\
         sodium.txt,200,1000,Sodium\n",
    )
    .unwrap();
    let jobs = load_manifest(&manifest).unwrap();

    let pipeline = Pipeline::new(Settings {
        data_dir: dir.path().to_path_buf(),
        ..Settings::default()
    });
    let mut sink = CollectSink::default();
    let summary = pipeline.run(&jobs, &mut sink);

    assert_eq!(sink.labels.len(), 1);
    assert!(sink.labels[0].starts_with("Sodium, resolution"));
    assert_eq!(summary.succeeded.len(), 1);
    assert_eq!(summary.failed.len(), 2);
    assert!(summary.failed.iter().all(|f| f.stage == Stage::Load));
    assert!(summary.failed[0].message.starts_with("parse error"));
    assert!(summary.failed[1].message.starts_with("file not found"));

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["failed"][0]["stage"], "load");
    assert_eq!(json["succeeded"][0]["samples"], 1000);
    assert!(json["succeeded"][0]["delta_wavelength_nm"].is_number());
}

#[test]
fn loader_and_transform_agree_on_synthetic_white_light() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("white.txt");
    let ifg = synth::white_light(-20.0, 20.0, 801, &mut SimpleRng::new(9));
    synth::write_instrument_file(&ifg, "white", BufWriter::new(File::create(&path).unwrap()))
        .unwrap();

    let loaded = load_interferogram(&path, &TableLayout::INTERFEROGRAM).unwrap();
    assert_eq!(loaded.len(), 801);
    let sp = transform(&loaded, 200e-9).unwrap();
    assert_eq!(sp.frequencies()[0], 0.0);
    assert_eq!(sp.wavelengths()[0], f64::INFINITY);
    assert_eq!(sp.frequencies().len(), sp.amplitudes().len());
}

#[test]
fn reference_export_loads_without_trimming() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("oceanHG.txt");
    fs::write(&path, "404.6 120\n435.8 300\n546.1 800\n577.0 210\n").unwrap();

    let reference = load_reference(&path, &TableLayout::REFERENCE).unwrap();
    assert_eq!(reference.len(), 4);
    let peak = reference.peak_in_window(400.0, 560.0).unwrap();
    assert_eq!(peak.wavelength_nm, 546.1);

    // The same file read as an interferogram export has no rows left.
    let err = load_interferogram(&path, &TableLayout::INTERFEROGRAM).unwrap_err();
    assert!(matches!(err, AnalysisError::Parse(_)));
}
