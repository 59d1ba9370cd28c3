#[macro_use] extern crate aimdx_assert_close;

mod common;

use std::path::Path;
use std::process::Command;

use aimdx_diffusion::constants::BOLTZMANN_EV;
use aimdx_tasks::run_conductivity;
use aimdx_tasks_config::{Settings, Smoothing, ValidatedSettings};
use tempdir::TempDir;

use crate::common::{write_temperature, FRAMES_PER_RUN};

// With a 2 fs step and a single time origin, D = amplitude^2 / 120 cm^2/s.
const AMPLITUDE_600: f64 = 0.3;
const AMPLITUDE_900: f64 = 0.5;

fn settings() -> ValidatedSettings {
    Settings {
        ballistic_skip: 0,
        smoothed: Smoothing::None,
        ..Settings::default()
    }.validate().unwrap()
}

fn study() -> TempDir {
    let root = TempDir::new("aimdx").unwrap();
    write_temperature(root.path(), "600K", AMPLITUDE_600, &[0, 1]);
    write_temperature(root.path(), "T900", AMPLITUDE_900, &[0, 1]);
    // no runs here; skipped unless strict
    std::fs::create_dir(root.path().join("1200K")).unwrap();
    std::fs::create_dir(root.path().join("plots")).unwrap();
    root
}

fn data_rows(path: &Path) -> Vec<Vec<f64>> {
    std::fs::read_to_string(path).unwrap()
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.split_whitespace().map(|x| x.parse().unwrap()).collect())
        .collect()
}

#[test]
fn two_temperatures() {
    let root = study();
    let summary = run_conductivity(root.path(), "Li".parse().unwrap(), &settings()).unwrap();

    let temps = summary.results.iter().map(|r| r.temperature).collect::<Vec<_>>();
    assert_eq!(temps, vec![600, 900]);

    let d_600 = AMPLITUDE_600.powi(2) / 120.0;
    let d_900 = AMPLITUDE_900.powi(2) / 120.0;
    assert_close!(rel=1e-6, summary.results[0].diffusivity, d_600);
    assert_close!(rel=1e-6, summary.results[1].diffusivity, d_900);
    // all of the motion is along x
    assert_close!(rel=1e-6, summary.results[0].diffusivity_components[0], 3.0 * d_600);
    assert_close!(rel=1e-6, summary.results[0].diffusivity_xy(), 3.0 * d_600);

    let ea = BOLTZMANN_EV * (d_900 / d_600).ln() / (1.0 / 600.0 - 1.0 / 900.0);
    assert_close!(rel=1e-6, summary.total.ea, ea);
    assert_close!(rel=1e-6, summary.components[0].ea, ea);
    assert_eq!(summary.total.ea_std, None);
    assert!(summary.conductivity > 0.0 && summary.conductivity.is_finite());

    // both runs are concatenated, and no ballistic frames were dropped
    let msd = data_rows(&root.path().join("msd.600.dat"));
    assert_eq!(msd.len(), 2 * FRAMES_PER_RUN);
    assert_close!(rel=1e-6, msd[10][1], AMPLITUDE_600.powi(2) * 10.0);
    assert!(root.path().join("msd.900.dat").exists());
    assert!(!root.path().join("msd.1200.dat").exists());

    let arrhenius = std::fs::read_to_string(root.path().join("arrhenius.txt")).unwrap();
    let rows = arrhenius.lines()
        .map(|line| line.split('\t').map(|x| x.parse::<f64>().unwrap()).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    assert_eq!(rows.len(), 2);
    assert_close!(rows[0][0], 1.0 / 600.0);
    assert_close!(rel=1e-6, rows[1][1], d_900.ln());
}

#[test]
fn strict_stops_at_missing_runs() {
    let root = study();
    let settings = Settings { strict: true, ..settings().0 }.validate().unwrap();
    assert!(run_conductivity(root.path(), "Li".parse().unwrap(), &settings).is_err());
}

#[test]
fn explicit_temperatures_need_two_results() {
    let root = study();
    let settings = Settings { temperatures: Some(vec![600, 1200]), ..settings().0 }.validate().unwrap();
    assert!(run_conductivity(root.path(), "Li".parse().unwrap(), &settings).is_err());
}

#[test]
fn run_zero_can_be_left_out() {
    let root = study();
    let settings = Settings { skip_run_zero: true, ..settings().0 }.validate().unwrap();
    run_conductivity(root.path(), "Li".parse().unwrap(), &settings).unwrap();

    let msd = data_rows(&root.path().join("msd.600.dat"));
    assert_eq!(msd.len(), FRAMES_PER_RUN);
}

#[test]
fn command_line() {
    let root = study();
    let status = Command::new(env!("CARGO_BIN_EXE_aimdx"))
        .args(&["Li+", "--smoothed", "none", "--ballistic-skip", "0", "-o", "results.txt"])
        .arg("-C").arg(root.path())
        .status()
        .unwrap();
    assert!(status.success());

    let log = std::fs::read_to_string(root.path().join("results.txt")).unwrap();
    assert!(log.contains("Species: Li+"), "{}", log);
    assert!(log.contains("Ea = "), "{}", log);
    assert!(log.contains("conductivity = "), "{}", log);

    let status = Command::new(env!("CARGO_BIN_EXE_aimdx"))
        .args(&["Li", "--time-step", "-1"])
        .arg("-C").arg(root.path())
        .status()
        .unwrap();
    assert!(!status.success());
}
