/* ********************************************************************** **
**  This file is part of aimdx.                                           **
**                                                                        **
**  aimdx is free software: you can redistribute it and/or modify it      **
**  under the terms of the GNU General Public License as published by     **
**  the Free Software Foundation, either version 3 of the License, or     **
**  (at your option) any later version.                                   **
**                                                                        **
**      http://www.gnu.org/licenses/                                      **
**                                                                        **
** Do note that, while the whole of aimdx is licensed under the GPL, many **
** parts of it are licensed under more permissive terms.                  **
** ********************************************************************** */

//! The conductivity pipeline: one diffusion analysis per temperature, then
//! Arrhenius fits across temperatures.
//!
//! Everything logged at `info` here is also the content of the results log.

use crate::FailResult;
use crate::discovery::{self, DiscoveryError, TemperatureDir};
use crate::runs::{self, RunZeroPolicy};

use std::io::prelude::*;
use std::path::Path;

use aimdx_diffusion::{self as diffusion, AnalyzerSettings, ArrheniusFit, DiffusionAnalyzer, ReferenceStructure};
use aimdx_structure::{Species, Trajectory};
use aimdx_structure_io::Xdatcar;
use aimdx_tasks_config::ValidatedSettings;

pub const RULE: &str = "-----------------------------";
pub const ARRHENIUS_FILENAME: &str = "arrhenius.txt";

/// Diffusivities (cm^2/s) from a single temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureResult {
    pub temperature: u32,
    pub diffusivity: f64,
    pub diffusivity_components: [f64; 3],
}

impl TemperatureResult {
    /// In-plane diffusivity, `sqrt(D_x^2 + D_y^2)`.
    pub fn diffusivity_xy(&self) -> f64 {
        let [x, y, _] = self.diffusivity_components;
        (x * x + y * y).sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct Summary {
    /// Successfully analyzed temperatures, in ascending order.
    pub results: Vec<TemperatureResult>,
    pub total: ArrheniusFit,
    pub components: [ArrheniusFit; 3],
    pub xy: ArrheniusFit,
    /// mS/cm, at the reference temperature of the settings.
    pub conductivity: f64,
}

/// Drop the first `count` frames.  Returns how many were actually dropped.
pub fn skip_ballistic(traj: &mut Trajectory, count: usize) -> usize
{ traj.skip_frames(count) }

/// Concatenate the trajectories of every run under a temperature directory.
pub fn load_trajectory(dir: &TemperatureDir, policy: RunZeroPolicy) -> FailResult<Trajectory>
{
    let range = runs::find_run_range(&dir.path, policy)?;
    debug!("{} K: {} runs, run_{} to run_{}", dir.temperature, range.len(), range.first, range.last);

    let mut out: Option<Trajectory> = None;
    for path in range.xdatcar_paths(&dir.path) {
        info!("Reading from {}...", path.display());
        let part = Xdatcar::from_path(&path)?.into_trajectory();
        out = Some(match out.take() {
            None => part,
            Some(mut traj) => {
                traj.extend(part)?;
                traj
            },
        });
    }
    out.ok_or_else(|| format_err!("no trajectories under {}", dir.path.display()))
}

/// Everything that happens for a single temperature.
///
/// Writes `msd.<T>.dat` into `out_dir`.
pub fn analyze_temperature(
    dir: &TemperatureDir,
    species: Species,
    settings: &ValidatedSettings,
    out_dir: &Path,
) -> FailResult<DiffusionAnalyzer>
{
    let policy = match settings.skip_run_zero {
        true => RunZeroPolicy::Exclude,
        false => RunZeroPolicy::Include,
    };
    let mut traj = load_trajectory(dir, policy)?;

    let skipped = skip_ballistic(&mut traj, settings.ballistic_skip);
    debug!("{} K: skipped {} ballistic frames, {} remain", dir.temperature, skipped, traj.len());

    let analyzer_settings = AnalyzerSettings {
        time_step: settings.time_step,
        step_skip: settings.step_skip,
        smoothing: settings.smoothed,
    };
    let analyzer = DiffusionAnalyzer::from_trajectory(&traj, species, f64::from(dir.temperature), &analyzer_settings)?;
    debug!(
        "{} K: D = {:e} +/- {:e} cm^2/s, max framework displacement {:.3} A",
        dir.temperature, analyzer.diffusivity, analyzer.diffusivity_std_dev,
        analyzer.max_framework_displacement,
    );

    let filename = format!("msd.{}.dat", dir.temperature);
    info!("Printing {}...", filename);
    analyzer.export_msdt(out_dir.join(filename))?;
    Ok(analyzer)
}

/// Run the whole pipeline on the temperature directories under `root`.
///
/// Output files are written into `root`.
pub fn run_conductivity(root: &Path, species: Species, settings: &ValidatedSettings) -> FailResult<Summary>
{
    let dirs = match &settings.temperatures {
        Some(temperatures) => discovery::resolve_temperature_dirs(root, temperatures)?,
        None => discovery::find_temperature_dirs(root)?,
    };
    let temperatures = dirs.iter().map(|d| d.temperature).collect::<Vec<_>>();

    info!("{}", RULE);
    info!("Species: {}", species);
    info!("Temperatures: {:?}", temperatures);
    info!("{}", RULE);

    let mut results = vec![];
    let mut reference: Option<ReferenceStructure> = None;
    for dir in &dirs {
        match analyze_temperature(dir, species, settings, root) {
            Ok(analyzer) => {
                results.push(TemperatureResult {
                    temperature: dir.temperature,
                    diffusivity: analyzer.diffusivity,
                    diffusivity_components: analyzer.diffusivity_components,
                });
                reference = Some(analyzer.reference);
            },
            Err(e) => {
                if settings.strict {
                    return Err(e.context(format!("while analyzing {} K", dir.temperature)).into());
                }
                report_skipped(dir.temperature, &e);
            },
        }
    }

    let reference = match reference {
        Some(reference) if results.len() >= 2 => reference,
        _ => bail!(
            "An Arrhenius fit needs at least two temperatures, but only {} could be analyzed.",
            results.len(),
        ),
    };

    let summary = fit_results(results, &reference, species, settings.reference_temperature)?;
    let fits = [
        ("Ea", &summary.total),
        ("Ea_x", &summary.components[0]),
        ("Ea_y", &summary.components[1]),
        ("Ea_z", &summary.components[2]),
        ("Ea_xy", &summary.xy),
    ];
    for &(label, fit) in &fits {
        info!("{} = {:.3} +/- {}", label, fit.ea, format_std(fit.ea_std));
    }

    write_arrhenius(&root.join(ARRHENIUS_FILENAME), &summary.results)?;

    debug!("extrapolated to {} K", settings.reference_temperature);
    info!("conductivity = {}", summary.conductivity);
    info!("{}", RULE);
    Ok(summary)
}

fn report_skipped(temperature: u32, e: &failure::Error) {
    match e.downcast_ref::<DiscoveryError>() {
        Some(DiscoveryError::NoRunDirs(_)) => {
            info!("No run directories found for {} K. Skipping...", temperature);
        },
        _ => {
            let causes = e.iter_chain().map(|c| c.to_string()).collect::<Vec<_>>();
            warn!("Skipping {} K: {}", temperature, causes.join(": "));
        },
    }
}

fn fit_results(
    results: Vec<TemperatureResult>,
    reference: &ReferenceStructure,
    species: Species,
    reference_temperature: f64,
) -> FailResult<Summary>
{
    let temps = results.iter().map(|r| f64::from(r.temperature)).collect::<Vec<_>>();
    let fit = |ds: Vec<f64>| diffusion::fit_arrhenius(&temps, &ds);

    let total = fit(results.iter().map(|r| r.diffusivity).collect())?;
    let component = |k: usize| fit(results.iter().map(|r| r.diffusivity_components[k]).collect());
    let components = [component(0)?, component(1)?, component(2)?];
    let xy = fit(results.iter().map(|r| r.diffusivity_xy()).collect())?;

    let ds = results.iter().map(|r| r.diffusivity).collect::<Vec<_>>();
    let conductivity = diffusion::extrapolated_conductivity(&temps, &ds, reference_temperature, reference, &species)?;

    Ok(Summary { results, total, components, xy, conductivity })
}

fn format_std(std: Option<f64>) -> String {
    match std {
        Some(std) => format!("{:.3}", std),
        None => "n/a".to_string(),
    }
}

/// One `1/T <tab> ln(D)` row per analyzed temperature.
fn write_arrhenius(path: &Path, results: &[TemperatureResult]) -> FailResult<()>
{
    let mut file = std::io::BufWriter::new(aimdx_fs_util::create(path)?);
    for result in results {
        writeln!(file, "{:.18e}\t{:.18e}", 1.0 / f64::from(result.temperature), result.diffusivity.ln())?;
    }
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimdx_structure::{Element, Frame, Lattice};

    fn li_chain(frames: usize) -> Trajectory {
        let frames = (0..frames)
            .map(|i| Frame { lattice: Lattice::cubic(10.0), fracs: vec![[i as f64 * 0.001, 0.0, 0.0]] })
            .collect();
        Trajectory::new(vec![Element::from_symbol("Li").unwrap()], frames).unwrap()
    }

    #[test]
    fn ballistic_skip_removes_prefix() {
        let mut traj = li_chain(120);
        assert_eq!(skip_ballistic(&mut traj, 50), 50);
        assert_eq!(traj.len(), 70);
        assert_close!(traj.first().unwrap().fracs[0][0], 0.05);

        assert_eq!(skip_ballistic(&mut traj, 0), 0);
        assert_eq!(skip_ballistic(&mut traj, 500), 70);
        assert!(traj.is_empty());
    }

    #[test]
    fn in_plane() {
        let result = TemperatureResult {
            temperature: 600,
            diffusivity: 1.0,
            diffusivity_components: [3.0, 4.0, 100.0],
        };
        assert_close!(result.diffusivity_xy(), 5.0);
    }

    #[test]
    fn uncertainty_formatting() {
        assert_eq!(format_std(Some(0.01234)), "0.012");
        assert_eq!(format_std(None), "n/a");
    }

    #[test]
    fn arrhenius_rows() {
        let dir = tempdir::TempDir::new("aimdx").unwrap();
        let path = dir.path().join(ARRHENIUS_FILENAME);
        let results = vec![
            TemperatureResult { temperature: 500, diffusivity: 1e-5, diffusivity_components: [1e-5; 3] },
            TemperatureResult { temperature: 1000, diffusivity: 1.0, diffusivity_components: [1.0; 3] },
        ];
        write_arrhenius(&path, &results).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let rows = text.lines()
            .map(|line| line.split('\t').map(|x| x.parse::<f64>().unwrap()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        assert_eq!(rows.len(), 2);
        assert_close!(rows[0][0], 0.002);
        assert_close!(rows[0][1], (1e-5f64).ln());
        assert_close!(abs=1e-15, rows[1][1], 0.0);
    }
}
