/* ************************************************************************ **
** This file is part of aimdx, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of aimdx is provided under this permissive         **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */


use crate::FailResult;
use crate::conductivity::{self, ReferenceStructure};
use crate::displacements::unwrapped_displacements;
use crate::lstsq::{self, LineFit};

use std::fmt;
use std::io::prelude::*;
use std::path::Path;
use std::str::FromStr;

use aimdx_structure::{Species, Trajectory};

/// Number of time origins averaged over by [`Smoothing::Constant`].
pub const CONSTANT_AVERAGE_STEPS: usize = 1000;

/// How the MSD curve is sampled and averaged.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Smoothing {
    /// Up to 200 lags starting after roughly 1 ps, each averaged over every
    /// available time origin.  The fit is weighted by `1/dt`.
    Max,
    /// Every lag up to `n_steps - 1000`, each averaged over the first 1000
    /// time origins.
    Constant,
    /// Every lag from a single time origin (the first frame).
    None,
}

impl Default for Smoothing {
    fn default() -> Self { Smoothing::Max }
}

impl FromStr for Smoothing {
    type Err = failure::Error;

    fn from_str(s: &str) -> FailResult<Self> {
        match s {
            "max" => Ok(Smoothing::Max),
            "constant" => Ok(Smoothing::Constant),
            "none" => Ok(Smoothing::None),
            _ => bail!("unknown smoothing mode {:?} (expected max, constant or none)", s),
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Smoothing::Max => "max",
            Smoothing::Constant => "constant",
            Smoothing::None => "none",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnalyzerSettings {
    /// Time between ionic steps of the simulation, in fs.
    pub time_step: f64,
    /// Number of ionic steps between consecutive frames.
    pub step_skip: usize,
    pub smoothing: Smoothing,
}

#[derive(Debug, Fail)]
pub enum AnalysisError {
    #[fail(display = "Not enough data to calculate diffusivity: {}", _0)]
    NotEnoughData(String),
    #[fail(display = "no {} sites in the trajectory", _0)]
    MissingSpecies(Species),
    #[fail(display = "{}", _0)]
    BadInput(String),
}

/// MSD analysis of one species at one temperature.
///
/// Diffusivities are in cm^2/s, conductivities in mS/cm, and times in fs.
#[derive(Debug, Clone)]
pub struct DiffusionAnalyzer {
    pub species: Species,
    pub temperature: f64,
    pub settings: AnalyzerSettings,
    /// First frame of the analyzed trajectory.
    pub reference: ReferenceStructure,

    pub dt: Vec<f64>,
    pub msd: Vec<f64>,
    /// Per cartesian axis.
    pub msd_components: Vec<[f64; 3]>,
    /// Mean squared displacement of the center of mass of the species, per atom.
    pub mscd: Vec<f64>,

    pub diffusivity: f64,
    pub diffusivity_std_dev: f64,
    pub diffusivity_components: [f64; 3],
    pub diffusivity_components_std_dev: [f64; 3],
    pub chg_diffusivity: f64,
    pub conductivity: f64,
    pub conductivity_std_dev: f64,
    /// Largest distance any framework site strays from its drift-corrected start, in Angstrom.
    pub max_framework_displacement: f64,
}

impl DiffusionAnalyzer {
    pub fn from_trajectory(
        traj: &Trajectory,
        species: Species,
        temperature: f64,
        settings: &AnalyzerSettings,
    ) -> Result<Self, AnalysisError> {
        if !(settings.time_step > 0.0) || settings.step_skip == 0 {
            return Err(AnalysisError::BadInput(format!(
                "time step ({}) and step skip ({}) must be positive",
                settings.time_step, settings.step_skip,
            )));
        }
        let reference = ReferenceStructure::from_first_frame(traj).ok_or_else(|| {
            AnalysisError::NotEnoughData("the trajectory has no frames".to_string())
        })?;

        let (indices, framework): (Vec<usize>, Vec<usize>) = {
            (0..traj.num_atoms()).partition(|&i| traj.elements()[i] == species.element)
        };
        if indices.is_empty() {
            return Err(AnalysisError::MissingSpecies(species));
        }

        let dc = drift_corrected(unwrapped_displacements(traj), &framework);
        let num_steps = traj.len();
        let lags = lag_steps(settings, num_steps, indices.len())?;
        if lags.len() < 3 {
            return Err(AnalysisError::NotEnoughData(format!(
                "{} frames only give {} usable time lags", num_steps, lags.len(),
            )));
        }
        debug!(
            "{} K: {} frames, lags {}..={} ({} points, {} smoothing)",
            temperature, num_steps, lags[0], lags[lags.len() - 1], lags.len(), settings.smoothing,
        );

        let dt = lags.iter()
            .map(|&lag| lag as f64 * settings.time_step * settings.step_skip as f64)
            .collect::<Vec<_>>();

        let mut msd = Vec::with_capacity(lags.len());
        let mut msd_components = Vec::with_capacity(lags.len());
        let mut mscd = Vec::with_capacity(lags.len());
        for &lag in &lags {
            let origins = match settings.smoothing {
                Smoothing::Max => num_steps - lag,
                Smoothing::Constant => CONSTANT_AVERAGE_STEPS,
                Smoothing::None => 1,
            };
            let stats = lag_statistics(&dc, &indices, lag, origins);
            msd.push(stats.msd);
            msd_components.push(stats.msd_components);
            mscd.push(stats.mscd);
        }

        let weights = match settings.smoothing {
            Smoothing::Max => Some(dt.iter().map(|&t| 1.0 / t).collect::<Vec<_>>()),
            _ => None,
        };
        let fit = |y: &[f64]| -> Result<LineFit, AnalysisError> {
            let fit = lstsq::fit_line(&dt, y, weights.as_ref().map(|w| &w[..])).ok_or_else(|| {
                AnalysisError::NotEnoughData("time lags are degenerate".to_string())
            })?;
            // f64::max would quietly replace a NaN slope with the floor below
            if !fit.slope.is_finite() {
                return Err(AnalysisError::BadInput(
                    "MSD slope is not finite; the trajectory has non-finite coordinates".to_string(),
                ));
            }
            Ok(fit)
        };

        let n = dt.len() as f64;
        let denom = {
            let sum = dt.iter().sum::<f64>();
            let sum_sq = dt.iter().map(|t| t * t).sum::<f64>();
            (n * sum_sq - sum * sum) * (n - 2.0)
        };
        // slope standard deviation, from the variance of the residuals
        let slope_std = |fit: &LineFit| (n * fit.residual / denom).sqrt();

        // 1 A^2/fs = 0.1 cm^2/s; MSD = 6 D t in 3D and 2 D t per axis
        let total = fit(&msd)?;
        let diffusivity = total.slope.max(1e-15) / 60.0;
        let diffusivity_std_dev = slope_std(&total) / 60.0;

        let mut diffusivity_components = [0.0; 3];
        let mut diffusivity_components_std_dev = [0.0; 3];
        for k in 0..3 {
            let axis = msd_components.iter().map(|v| v[k]).collect::<Vec<_>>();
            let axis_fit = fit(&axis)?;
            diffusivity_components[k] = axis_fit.slope.max(1e-15) / 20.0;
            diffusivity_components_std_dev[k] = slope_std(&axis_fit) / 20.0;
        }

        let chg_diffusivity = fit(&mscd)?.slope.max(1e-15) / 60.0;

        let factor = conductivity::conversion_factor(&reference, &species, temperature);
        let max_framework_displacement = framework.iter()
            .flat_map(|&i| dc[i].iter())
            .map(norm)
            .fold(0.0, f64::max);

        Ok(DiffusionAnalyzer {
            species, temperature,
            settings: *settings,
            reference,
            dt, msd, msd_components, mscd,
            diffusivity, diffusivity_std_dev,
            diffusivity_components, diffusivity_components_std_dev,
            chg_diffusivity,
            conductivity: diffusivity * factor,
            conductivity_std_dev: diffusivity_std_dev * factor,
            max_framework_displacement,
        })
    }

    /// Write the MSD curve as a table with columns `t MSD MSD_a MSD_b MSD_c MSCD`.
    ///
    /// Files ending in `.csv` are comma separated; anything else is space
    /// separated with the header behind a `#`.
    pub fn export_msdt(&self, path: impl AsRef<Path>) -> FailResult<()> {
        let path = path.as_ref();
        let csv = path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

        let mut file = std::io::BufWriter::new(aimdx_fs_util::create(path)?);
        self.write_msdt(&mut file, csv)?;
        file.flush()?;
        Ok(())
    }

    fn write_msdt(&self, w: &mut dyn Write, csv: bool) -> FailResult<()> {
        let delimiter = if csv { ", " } else { " " };
        if !csv {
            write!(w, "# ")?;
        }
        writeln!(w, "{}", ["t", "MSD", "MSD_a", "MSD_b", "MSD_c", "MSCD"].join(delimiter))?;

        for i in 0..self.dt.len() {
            let [a, b, c] = self.msd_components[i];
            let row = [self.dt[i], self.msd[i], a, b, c, self.mscd[i]];
            let row = row.iter().map(|x| x.to_string()).collect::<Vec<_>>();
            writeln!(w, "{}", row.join(delimiter))?;
        }
        Ok(())
    }
}

// Subtract the mean displacement of the framework from every site.
fn drift_corrected(mut disp: Vec<Vec<[f64; 3]>>, framework: &[usize]) -> Vec<Vec<[f64; 3]>> {
    if framework.is_empty() {
        return disp;
    }
    let num_frames = disp[framework[0]].len();
    let drift = (0..num_frames)
        .map(|frame| {
            let mut sum = [0.0; 3];
            for &i in framework {
                for k in 0..3 {
                    sum[k] += disp[i][frame][k];
                }
            }
            let count = framework.len() as f64;
            [sum[0] / count, sum[1] / count, sum[2] / count]
        })
        .collect::<Vec<_>>();

    for site in &mut disp {
        for (v, drift) in site.iter_mut().zip(&drift) {
            for k in 0..3 {
                v[k] -= drift[k];
            }
        }
    }
    disp
}

// Lags (in frames) at which the MSD is sampled.
fn lag_steps(settings: &AnalyzerSettings, num_steps: usize, num_species: usize) -> Result<Vec<usize>, AnalysisError> {
    match settings.smoothing {
        Smoothing::None => Ok((0..num_steps).collect()),
        Smoothing::Constant => {
            if num_steps <= CONSTANT_AVERAGE_STEPS {
                return Err(AnalysisError::NotEnoughData(format!(
                    "constant smoothing needs more than {} frames, got {}",
                    CONSTANT_AVERAGE_STEPS, num_steps,
                )));
            }
            Ok((0..num_steps - CONSTANT_AVERAGE_STEPS).collect())
        },
        Smoothing::Max => {
            let min_lag = (1000.0 / (settings.step_skip as f64 * settings.time_step)) as usize;
            let min_lag = min_lag.max(1);
            let max_lag = usize::min(num_species * num_steps / 30, num_steps);
            if min_lag >= max_lag {
                return Err(AnalysisError::NotEnoughData(format!(
                    "{} frames of {} sites cannot cover lags from {} frames (1 ps)",
                    num_steps, num_species, min_lag,
                )));
            }
            let stride = usize::max((max_lag - min_lag) / 200, 1);
            Ok((min_lag..max_lag).step_by(stride).collect())
        },
    }
}

struct LagStatistics {
    msd: f64,
    msd_components: [f64; 3],
    mscd: f64,
}

// Averages over the species sites and the time origins `0..origins`.
fn lag_statistics(dc: &[Vec<[f64; 3]>], indices: &[usize], lag: usize, origins: usize) -> LagStatistics {
    let mut components = [0.0; 3];
    let mut charge = 0.0;
    for origin in 0..origins {
        let mut center = [0.0; 3];
        for &i in indices {
            let (start, end) = (dc[i][origin], dc[i][origin + lag]);
            for k in 0..3 {
                let d = end[k] - start[k];
                components[k] += d * d;
                center[k] += d;
            }
        }
        charge += center.iter().map(|x| x * x).sum::<f64>();
    }

    let count = (origins * indices.len()) as f64;
    let msd_components = [components[0] / count, components[1] / count, components[2] / count];
    LagStatistics {
        msd: msd_components.iter().sum(),
        msd_components,
        mscd: charge / origins as f64 / indices.len() as f64,
    }
}

fn norm(v: &[f64; 3]) -> f64
{ (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt() }

#[cfg(test)]
mod tests {
    use super::*;
    use aimdx_structure::{Element, Frame, Lattice};

    const BOX: f64 = 100.0;

    fn species() -> Species { "Li+".parse().unwrap() }

    fn settings(smoothing: Smoothing) -> AnalyzerSettings {
        AnalyzerSettings { time_step: 2.0, step_skip: 1, smoothing }
    }

    // Sites given by cartesian positions per frame, in a large cubic box.
    fn trajectory(elements: &[&str], positions: Vec<Vec<[f64; 3]>>) -> Trajectory {
        let lattice = Lattice::cubic(BOX);
        let frames = positions.into_iter()
            .map(|carts| Frame {
                lattice,
                fracs: carts.iter().map(|v| [v[0] / BOX, v[1] / BOX, v[2] / BOX]).collect(),
            })
            .collect();
        let elements = elements.iter().map(|s| Element::from_symbol(s).unwrap()).collect();
        Trajectory::new(elements, frames).unwrap()
    }

    // Li moves so that its squared displacement is exactly `rate * t`, on
    // top of a drift shared by every site.
    fn sqrt_walk(num_frames: usize, rate: f64, drift: f64) -> Trajectory {
        let positions = (0..num_frames)
            .map(|step| {
                let t = step as f64 * 2.0;
                let shift = drift * step as f64;
                vec![
                    [10.0 + (rate * t).sqrt() + shift, 10.0, 10.0],
                    [50.0 + shift, 50.0, 50.0],
                    [60.0 + shift, 50.0, 50.0],
                ]
            })
            .collect();
        trajectory(&["Li", "O", "O"], positions)
    }

    #[test]
    fn exact_diffusivity_without_smoothing() {
        let rate = 0.5;
        let traj = sqrt_walk(20, rate, 0.0);
        let analyzer = DiffusionAnalyzer::from_trajectory(&traj, species(), 1000.0, &settings(Smoothing::None)).unwrap();

        assert_eq!(analyzer.dt.len(), 20);
        assert_close!(analyzer.dt[3], 6.0);
        assert_close!(rel=1e-9, abs=1e-12, analyzer.msd[3], 3.0);
        assert_close!(rel=1e-9, analyzer.diffusivity, rate / 60.0);
        assert_close!(rel=1e-9, analyzer.diffusivity_components[0], rate / 20.0);
        assert_close!(analyzer.diffusivity_components[1], 1e-15 / 20.0);
        assert_close!(abs=1e-9, analyzer.diffusivity_std_dev, 0.0);
        assert_close!(analyzer.max_framework_displacement, 0.0);
    }

    #[test]
    fn framework_drift_is_removed() {
        let rate = 0.5;
        let traj = sqrt_walk(20, rate, 0.05);
        let analyzer = DiffusionAnalyzer::from_trajectory(&traj, species(), 1000.0, &settings(Smoothing::None)).unwrap();
        assert_close!(rel=1e-8, analyzer.diffusivity, rate / 60.0);
        assert_close!(abs=1e-9, analyzer.max_framework_displacement, 0.0);
    }

    #[test]
    fn single_atom_mscd_matches_msd() {
        let traj = sqrt_walk(20, 0.5, 0.0);
        let analyzer = DiffusionAnalyzer::from_trajectory(&traj, species(), 1000.0, &settings(Smoothing::None)).unwrap();
        assert_close!(abs=1e-12, analyzer.mscd, analyzer.msd);
        assert_close!(rel=1e-9, analyzer.chg_diffusivity, analyzer.diffusivity);
    }

    // deterministic xorshift, for reproducible random walks
    struct Rng(u64);
    impl Rng {
        fn sign(&mut self) -> f64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            if (self.0 >> 32) & 1 == 0 { 1.0 } else { -1.0 }
        }
    }

    // `num_li` walkers taking a +-hop step along every axis each frame, plus
    // one fixed O.
    fn random_walk(num_li: usize, num_frames: usize, hop: f64) -> Trajectory {
        let mut rng = Rng(0x2545_F491_4F6C_DD1D);
        let mut current = (0..num_li).map(|i| [i as f64 * 0.5, 50.0, 50.0]).collect::<Vec<_>>();
        let mut positions = vec![];
        for _ in 0..num_frames {
            let mut frame = current.clone();
            frame.push([50.0, 50.0, 50.0]);
            positions.push(frame);
            for v in &mut current {
                for x in v.iter_mut() {
                    *x += hop * rng.sign();
                }
            }
        }
        let mut elements = vec!["Li"; num_li];
        elements.push("O");
        trajectory(&elements, positions)
    }

    #[test]
    fn random_walk_with_max_smoothing() {
        let hop = 0.1;
        let traj = random_walk(128, 1500, hop);

        let settings = AnalyzerSettings { time_step: 10.0, ..settings(Smoothing::Max) };
        let analyzer = DiffusionAnalyzer::from_trajectory(&traj, species(), 1000.0, &settings).unwrap();
        // lags start at 1 ps
        assert_eq!(analyzer.dt[0], 1000.0);
        assert!(analyzer.dt.len() <= 201);

        // MSD grows by 3 hop^2 per 10 fs frame
        let expected = 3.0 * hop * hop / 10.0 / 60.0;
        assert_close!(rel=0.3, analyzer.diffusivity, expected);
        assert!(analyzer.conductivity > 0.0);
    }

    #[test]
    fn random_walk_with_constant_smoothing() {
        let (hop, num_frames) = (0.1, CONSTANT_AVERAGE_STEPS + 300);
        let traj = random_walk(64, num_frames, hop);

        let settings = AnalyzerSettings { time_step: 10.0, ..settings(Smoothing::Constant) };
        let analyzer = DiffusionAnalyzer::from_trajectory(&traj, species(), 1000.0, &settings).unwrap();
        // every lag below n - 1000, starting from zero
        assert_eq!(analyzer.dt.len(), num_frames - CONSTANT_AVERAGE_STEPS);
        assert_eq!(analyzer.dt[0], 0.0);
        assert_eq!(analyzer.dt[1], 10.0);
        assert_close!(analyzer.msd[0], 0.0);

        let expected = 3.0 * hop * hop / 10.0 / 60.0;
        assert_close!(rel=0.3, analyzer.diffusivity, expected);
        assert_close!(rel=0.3, analyzer.diffusivity_components[0], expected);
        assert!(analyzer.diffusivity_std_dev > 0.0);
    }

    #[test]
    fn non_finite_coordinates() {
        let mut positions = (0..20)
            .map(|step| vec![[10.0 + step as f64 * 0.1, 10.0, 10.0], [50.0, 50.0, 50.0]])
            .collect::<Vec<_>>();
        positions[5][0][1] = std::f64::NAN;
        let traj = trajectory(&["Li", "O"], positions);

        match DiffusionAnalyzer::from_trajectory(&traj, species(), 1000.0, &settings(Smoothing::None)) {
            Err(AnalysisError::BadInput(_)) => {},
            r => panic!("unexpected: {:?}", r.map(|a| a.diffusivity)),
        }
    }

    #[test]
    fn not_enough_data() {
        let traj = sqrt_walk(100, 0.5, 0.0);
        for &smoothing in &[Smoothing::Max, Smoothing::Constant] {
            match DiffusionAnalyzer::from_trajectory(&traj, species(), 1000.0, &settings(smoothing)) {
                Err(AnalysisError::NotEnoughData(_)) => {},
                r => panic!("unexpected: {:?}", r.map(|a| a.diffusivity)),
            }
        }

        let short = sqrt_walk(2, 0.5, 0.0);
        match DiffusionAnalyzer::from_trajectory(&short, species(), 1000.0, &settings(Smoothing::None)) {
            Err(AnalysisError::NotEnoughData(_)) => {},
            r => panic!("unexpected: {:?}", r.map(|a| a.diffusivity)),
        }
    }

    #[test]
    fn missing_species() {
        let traj = sqrt_walk(20, 0.5, 0.0);
        let na = "Na".parse().unwrap();
        match DiffusionAnalyzer::from_trajectory(&traj, na, 1000.0, &settings(Smoothing::None)) {
            Err(AnalysisError::MissingSpecies(_)) => {},
            r => panic!("unexpected: {:?}", r.map(|a| a.diffusivity)),
        }
    }

    #[test]
    fn msdt_formats() {
        let traj = sqrt_walk(5, 0.5, 0.0);
        let analyzer = DiffusionAnalyzer::from_trajectory(&traj, species(), 1000.0, &settings(Smoothing::None)).unwrap();

        let dir = tempdir::TempDir::new("aimdx").unwrap();
        analyzer.export_msdt(dir.path().join("msd.1000.dat")).unwrap();
        analyzer.export_msdt(dir.path().join("msd.csv")).unwrap();

        let dat = std::fs::read_to_string(dir.path().join("msd.1000.dat")).unwrap();
        let mut lines = dat.lines();
        assert_eq!(lines.next(), Some("# t MSD MSD_a MSD_b MSD_c MSCD"));
        assert_eq!(lines.next(), Some("0 0 0 0 0 0"));
        assert_eq!(lines.count(), 4);

        let csv = std::fs::read_to_string(dir.path().join("msd.csv")).unwrap();
        assert!(csv.starts_with("t, MSD, MSD_a, MSD_b, MSD_c, MSCD\n"));
        assert_eq!(csv.lines().nth(2).unwrap().split(", ").count(), 6);
    }

    #[test]
    fn smoothing_names() {
        for &mode in &[Smoothing::Max, Smoothing::Constant, Smoothing::None] {
            assert_eq!(mode.to_string().parse::<Smoothing>().unwrap(), mode);
        }
        assert!("maximum".parse::<Smoothing>().is_err());
    }
}
